use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::model::payslip::Payslip;
use crate::payroll::calculator::PayComputation;
use crate::payroll::period::PayPeriod;

/// Stamps a computed month with a fresh id and generation time.
///
/// The remark is copied verbatim; substitution of a fallback happens in the
/// remark capability before it gets here.
pub fn assemble(
    employee_id: &str,
    period: PayPeriod,
    attendance_percentage: Decimal,
    computation: PayComputation,
    remark: Option<String>,
) -> Payslip {
    let PayComputation {
        earnings,
        deductions,
        net_salary,
    } = computation;

    Payslip {
        id: Uuid::new_v4().to_string(),
        employee_id: employee_id.to_string(),
        month: period.to_string(),
        year: period.year(),
        generated_date: Utc::now(),
        attendance_percentage,
        earnings,
        deductions,
        net_salary,
        remarks: remark,
    }
}
