use std::fmt::Debug;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::PayrollError;
use crate::payroll::calculator::round_currency;

/// Tax deducted at source, as a function of monthly gross earnings only.
pub trait TdsPolicy: Debug + Send + Sync {
    fn tds(&self, gross: Decimal) -> Decimal;

    fn validate(&self) -> Result<(), PayrollError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTds;

impl TdsPolicy for NoTds {
    fn tds(&self, _gross: Decimal) -> Decimal {
        Decimal::ZERO
    }
}

/// Flat rate on the whole gross, nothing below the exemption limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatTds {
    pub rate: Decimal,
    pub exemption_limit: Decimal,
}

impl Default for FlatTds {
    /// 10 % above 1,00,000 a month (roughly the 12 lakh annual rebate line).
    fn default() -> Self {
        Self {
            rate: dec!(0.10),
            exemption_limit: dec!(100000),
        }
    }
}

impl TdsPolicy for FlatTds {
    fn tds(&self, gross: Decimal) -> Decimal {
        if gross < self.exemption_limit {
            return Decimal::ZERO;
        }
        round_currency(gross * self.rate)
    }

    fn validate(&self) -> Result<(), PayrollError> {
        check_rate("TDS rate", self.rate)?;
        check_amount("TDS exemption limit", self.exemption_limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TdsSlab {
    /// Gross above this amount is taxed at `rate`, up to the next slab.
    pub above: Decimal,
    pub rate: Decimal,
}

/// Progressive brackets on monthly gross.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabTds {
    slabs: Vec<TdsSlab>,
}

impl SlabTds {
    pub fn new(slabs: Vec<TdsSlab>) -> Result<Self, PayrollError> {
        let policy = Self { slabs };
        policy.validate()?;
        Ok(policy)
    }

    /// Parses `"50000:0.05,100000:0.1"`.
    pub fn parse(raw: &str) -> Result<Self, PayrollError> {
        let invalid = |part: &str| {
            PayrollError::InvalidStatutoryConfig(format!(
                "TDS slab {:?} is not of the form <above>:<rate>",
                part
            ))
        };

        let slabs = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (above, rate) = part.split_once(':').ok_or_else(|| invalid(part))?;
                Ok(TdsSlab {
                    above: above.trim().parse().map_err(|_| invalid(part))?,
                    rate: rate.trim().parse().map_err(|_| invalid(part))?,
                })
            })
            .collect::<Result<Vec<_>, PayrollError>>()?;

        Self::new(slabs)
    }
}

impl TdsPolicy for SlabTds {
    fn tds(&self, gross: Decimal) -> Decimal {
        let mut tax = Decimal::ZERO;

        for (i, slab) in self.slabs.iter().enumerate() {
            if gross <= slab.above {
                break;
            }
            let ceiling = self
                .slabs
                .get(i + 1)
                .map_or(gross, |next| next.above.min(gross));
            tax += (ceiling - slab.above) * slab.rate;
        }

        round_currency(tax)
    }

    fn validate(&self) -> Result<(), PayrollError> {
        if self.slabs.is_empty() {
            return Err(PayrollError::InvalidStatutoryConfig(
                "TDS slab policy needs at least one slab".into(),
            ));
        }
        for slab in &self.slabs {
            check_amount("TDS slab threshold", slab.above)?;
            check_rate("TDS slab rate", slab.rate)?;
        }
        if self.slabs.windows(2).any(|w| w[0].above >= w[1].above) {
            return Err(PayrollError::InvalidStatutoryConfig(
                "TDS slab thresholds must be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

/// Statutory rates the calculator applies. Defaults follow the Indian regime.
#[derive(Debug, Clone)]
pub struct StatutoryConfig {
    /// Employee PF share on basic
    pub pf_rate: Decimal,
    pub esi_employee_rate: Decimal,
    /// ESI applies while gross is at or below this amount
    pub esi_wage_limit: Decimal,
    pub professional_tax: Decimal,
    pub tds: Arc<dyn TdsPolicy>,
}

impl Default for StatutoryConfig {
    fn default() -> Self {
        Self {
            pf_rate: dec!(0.12),
            esi_employee_rate: dec!(0.0075),
            esi_wage_limit: dec!(21000),
            professional_tax: dec!(200),
            tds: Arc::new(FlatTds::default()),
        }
    }
}

impl StatutoryConfig {
    pub fn with_tds(mut self, tds: impl TdsPolicy + 'static) -> Self {
        self.tds = Arc::new(tds);
        self
    }

    pub fn validate(&self) -> Result<(), PayrollError> {
        check_rate("PF rate", self.pf_rate)?;
        check_rate("ESI employee rate", self.esi_employee_rate)?;
        check_amount("ESI wage limit", self.esi_wage_limit)?;
        check_amount("Professional tax", self.professional_tax)?;
        self.tds.validate()
    }
}

fn check_rate(name: &str, rate: Decimal) -> Result<(), PayrollError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(PayrollError::InvalidStatutoryConfig(format!(
            "{} must be within 0..=1 (got {})",
            name, rate
        )));
    }
    Ok(())
}

fn check_amount(name: &str, amount: Decimal) -> Result<(), PayrollError> {
    if amount < Decimal::ZERO {
        return Err(PayrollError::InvalidStatutoryConfig(format!(
            "{} must not be negative (got {})",
            name, amount
        )));
    }
    Ok(())
}
