use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::PayrollError;

/// Employee as read from the directory. Payroll never writes it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "EMP001",
        "name": "Rajesh Kumar",
        "email": "rajesh.k@example.com",
        "phone": "+919876543210",
        "role": "Senior Developer",
        "department": "Engineering",
        "joinDate": "2022-03-15",
        "pan": "ABCDE1234F",
        "basicSalary": 45000,
        "hra": 18000,
        "da": 4500,
        "specialAllowance": 5000
    })
)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(nullable = true)]
    pub phone: Option<String>,
    pub role: String,
    pub department: String,
    #[schema(value_type = Option<String>, format = "date")]
    pub join_date: Option<NaiveDate>,
    pub pan: Option<String>,

    #[schema(value_type = f64)]
    pub basic_salary: Decimal,
    #[schema(value_type = f64)]
    pub hra: Decimal,
    #[schema(value_type = f64)]
    pub da: Decimal,
    #[schema(value_type = f64)]
    pub special_allowance: Decimal,

    pub bank_account_number: Option<String>,
    pub pf_account_number: Option<String>,
    pub esi_number: Option<String>,
}

impl Employee {
    pub fn salary_structure(&self) -> SalaryStructure {
        SalaryStructure {
            basic_salary: self.basic_salary,
            hra: self.hra,
            da: self.da,
            special_allowance: self.special_allowance,
        }
    }
}

/// Fixed monthly salary heads, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStructure {
    #[schema(value_type = f64, example = 45000)]
    pub basic_salary: Decimal,
    #[schema(value_type = f64, example = 18000)]
    pub hra: Decimal,
    #[schema(value_type = f64, example = 4500)]
    pub da: Decimal,
    #[schema(value_type = f64, example = 5000)]
    pub special_allowance: Decimal,
}

impl SalaryStructure {
    pub fn validate(&self) -> Result<(), PayrollError> {
        let heads = [
            ("basicSalary", self.basic_salary),
            ("hra", self.hra),
            ("da", self.da),
            ("specialAllowance", self.special_allowance),
        ];

        for (component, amount) in heads {
            if amount < Decimal::ZERO {
                return Err(PayrollError::NegativeComponent { component, amount });
            }
        }
        Ok(())
    }
}
