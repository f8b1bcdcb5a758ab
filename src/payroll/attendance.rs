use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::PayrollError;
use crate::model::attendance::AttendanceRecord;
use crate::payroll::period::PayPeriod;

/// Percentage of the month an employee was present, to one decimal place.
///
/// `records` are the employee's marks for the month; a full day counts 1,
/// a half day 0.5, absence and leave nothing. Rounds half away from zero.
pub fn attendance_percentage(
    records: &[AttendanceRecord],
    total_days_in_month: u32,
) -> Result<Decimal, PayrollError> {
    if total_days_in_month == 0 {
        return Err(PayrollError::NonPositiveDaysInMonth(total_days_in_month));
    }

    let present_days: Decimal = records.iter().map(|r| r.status.present_credit()).sum();
    let percentage = present_days * Decimal::ONE_HUNDRED / Decimal::from(total_days_in_month);

    Ok(percentage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Aggregates the records that fall inside `period`, ignoring the rest.
pub fn attendance_for_period(
    records: &[AttendanceRecord],
    period: PayPeriod,
) -> Result<Decimal, PayrollError> {
    let in_period: Vec<AttendanceRecord> = records
        .iter()
        .filter(|r| period.contains(r.date))
        .cloned()
        .collect();

    attendance_percentage(&in_period, period.days_in_month())
}
