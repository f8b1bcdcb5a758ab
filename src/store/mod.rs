use async_trait::async_trait;

use crate::errors::StoreError;
use crate::model::attendance::{AttendanceMark, AttendanceRecord};
use crate::model::employee::Employee;
use crate::model::payslip::Payslip;
use crate::payroll::period::PayPeriod;

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Read access to the employee directory.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_employee(&self, id: &str) -> Result<Option<Employee>, StoreError>;

    /// Ordered by id. `search` matches id, name or department, case-insensitively.
    async fn list_employees(&self, search: Option<&str>) -> Result<Vec<Employee>, StoreError>;
}

/// Daily attendance marks, at most one per employee per day.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Inserts or replaces the mark for that employee and day.
    async fn upsert_mark(&self, mark: &AttendanceMark) -> Result<(), StoreError>;

    async fn records_for(
        &self,
        employee_id: &str,
        period: PayPeriod,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn marks_in(
        &self,
        period: PayPeriod,
        employee_id: Option<&str>,
    ) -> Result<Vec<AttendanceMark>, StoreError>;
}

/// Append-only payslip history.
#[async_trait]
pub trait PayslipStore: Send + Sync {
    async fn append_payslip(&self, payslip: &Payslip) -> Result<(), StoreError>;

    async fn find_payslip(&self, id: &str) -> Result<Option<Payslip>, StoreError>;

    /// Newest first.
    async fn history(&self, employee_id: &str) -> Result<Vec<Payslip>, StoreError>;
}
