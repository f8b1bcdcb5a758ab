use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::PayrollError;
use crate::model::employee::SalaryStructure;
use crate::model::payslip::{Deductions, Earnings};
use crate::payroll::policy::StatutoryConfig;

/// Rounds to whole currency units, half away from zero.
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Earnings, deductions and net pay for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayComputation {
    pub earnings: Earnings,
    pub deductions: Deductions,
    pub net_salary: Decimal,
}

impl PayComputation {
    pub fn has_negative_net_pay(&self) -> bool {
        self.net_salary < Decimal::ZERO
    }
}

/// Pro-rates a fixed salary structure by attendance and applies statutory deductions.
#[derive(Debug, Clone)]
pub struct PayslipCalculator {
    config: StatutoryConfig,
}

impl PayslipCalculator {
    pub fn new(config: StatutoryConfig) -> Result<Self, PayrollError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    pub fn compute(
        &self,
        salary: &SalaryStructure,
        attendance_percentage: Decimal,
    ) -> Result<PayComputation, PayrollError> {
        salary.validate()?;
        if attendance_percentage < Decimal::ZERO || attendance_percentage > Decimal::ONE_HUNDRED {
            return Err(PayrollError::AttendanceOutOfRange(attendance_percentage));
        }

        let earnings = self.earnings(salary, attendance_percentage / Decimal::ONE_HUNDRED)?;
        let deductions = self.deductions(&earnings)?;
        let net_salary = earnings.gross - deductions.total_deductions;

        Ok(PayComputation {
            earnings,
            deductions,
            net_salary,
        })
    }

    // Each head is pro-rated and rounded on its own; gross is the sum of the rounded heads.
    fn earnings(&self, salary: &SalaryStructure, factor: Decimal) -> Result<Earnings, PayrollError> {
        let basic = round_currency(salary.basic_salary * factor);
        let hra = round_currency(salary.hra * factor);
        let da = round_currency(salary.da * factor);
        let special_allowance = round_currency(salary.special_allowance * factor);

        Ok(Earnings {
            basic,
            hra,
            da,
            special_allowance,
            gross: checked_sum("gross earnings", &[basic, hra, da, special_allowance])?,
        })
    }

    fn deductions(&self, earnings: &Earnings) -> Result<Deductions, PayrollError> {
        let config = &self.config;

        let pf = round_currency(earnings.basic * config.pf_rate);
        let esi = if earnings.gross <= config.esi_wage_limit {
            round_currency(earnings.gross * config.esi_employee_rate)
        } else {
            Decimal::ZERO
        };
        let pt = if earnings.gross.is_zero() {
            Decimal::ZERO
        } else {
            config.professional_tax
        };
        let tax = round_currency(config.tds.tds(earnings.gross)).max(Decimal::ZERO);

        Ok(Deductions {
            pf,
            esi,
            pt,
            tax,
            total_deductions: checked_sum("total deductions", &[pf, esi, pt, tax])?,
        })
    }
}

fn checked_sum(total: &'static str, parts: &[Decimal]) -> Result<Decimal, PayrollError> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, part| acc.checked_add(*part))
        .ok_or(PayrollError::AmountOverflow(total))
}
