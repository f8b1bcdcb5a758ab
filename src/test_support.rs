//! Fixtures shared by unit and handler tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::Config;
use crate::errors::RemarkError;
use crate::model::employee::Employee;
use crate::payroll::calculator::PayslipCalculator;
use crate::payroll::policy::{NoTds, StatutoryConfig};
use crate::payroll::remark::{RemarkContext, RemarkGenerator};
use crate::payroll::service::PayrollService;
use crate::store::memory::MemoryStore;

pub const JWT_SECRET: &str = "test-secret";

pub fn employee(id: &str, basic_salary: Decimal) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Employee {}", id),
        email: format!("{}@example.com", id.to_lowercase()),
        phone: None,
        role: "Engineer".to_string(),
        department: "Engineering".to_string(),
        join_date: None,
        pan: None,
        basic_salary,
        hra: Decimal::ZERO,
        da: Decimal::ZERO,
        special_allowance: Decimal::ZERO,
        bank_account_number: None,
        pf_account_number: None,
        esi_number: None,
    }
}

pub fn rajesh() -> Employee {
    Employee {
        name: "Rajesh Kumar".to_string(),
        role: "Senior Developer".to_string(),
        hra: dec!(18000),
        da: dec!(4500),
        special_allowance: dec!(5000),
        pf_account_number: Some("MH/BAN/0012345/000/001".to_string()),
        ..employee("EMP001", dec!(45000))
    }
}

/// Answers every request with a fixed remark, or fails every request.
pub struct StaticRemark(Option<String>);

impl StaticRemark {
    pub fn ok(remark: &str) -> Arc<dyn RemarkGenerator> {
        Arc::new(StaticRemark(Some(remark.to_string())))
    }

    pub fn failing() -> Arc<dyn RemarkGenerator> {
        Arc::new(StaticRemark(None))
    }
}

#[async_trait]
impl RemarkGenerator for StaticRemark {
    async fn generate_remark(&self, _context: &RemarkContext) -> Result<String, RemarkError> {
        self.0
            .clone()
            .ok_or_else(|| RemarkError::Unavailable("stub outage".into()))
    }
}

/// Service over a fresh in-memory store, without income tax.
pub fn memory_service(
    employees: Vec<Employee>,
    remarks: Arc<dyn RemarkGenerator>,
) -> (PayrollService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_employees(employees));
    let calculator = PayslipCalculator::new(StatutoryConfig::default().with_tds(NoTds)).unwrap();
    let service = PayrollService::new(store.clone(), store.clone(), store.clone(), calculator, remarks);
    (service, store)
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("SERVER_ADDR", "127.0.0.1:0"),
        ("DATABASE_URL", "mysql://unused"),
        ("JWT_SECRET", JWT_SECRET),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}
