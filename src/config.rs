use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use dotenvy::dotenv;
use rust_decimal::Decimal;

use crate::payroll::policy::{FlatTds, NoTds, SlabTds, StatutoryConfig, TdsPolicy};
use crate::payroll::remark::RemarkSettings;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_generate_per_min: u32,

    pub api_prefix: String,

    pub statutory: StatutoryConfig,
    pub remarks: RemarkSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let vars = Vars(&lookup);

        let config = Self {
            server_addr: vars.required("SERVER_ADDR")?,
            database_url: vars.required("DATABASE_URL")?,
            jwt_secret: vars.required("JWT_SECRET")?,

            rate_protected_per_min: vars.parsed("RATE_PROTECTED_PER_MIN", 1000)?,
            rate_generate_per_min: vars.parsed("RATE_GENERATE_PER_MIN", 30)?,

            api_prefix: vars
                .optional("API_PREFIX")
                .unwrap_or_else(|| "/api".to_string()),

            statutory: statutory_from(&vars)?,
            remarks: remarks_from(&vars)?,
        };

        config
            .statutory
            .validate()
            .context("statutory payroll settings are invalid")?;
        Ok(config)
    }
}

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> anyhow::Result<String> {
        self.optional(key)
            .ok_or_else(|| anyhow!("{} must be set", key))
    }

    fn parsed<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("{} has invalid value {:?}: {}", key, raw, e)),
            None => Ok(default),
        }
    }
}

fn statutory_from<F: Fn(&str) -> Option<String>>(vars: &Vars<'_, F>) -> anyhow::Result<StatutoryConfig> {
    let defaults = StatutoryConfig::default();
    let flat = FlatTds::default();

    let policy = vars
        .optional("TDS_POLICY")
        .unwrap_or_else(|| "flat".to_string());
    let tds: Arc<dyn TdsPolicy> = match policy.trim().to_lowercase().as_str() {
        "none" => Arc::new(NoTds),
        "flat" => Arc::new(FlatTds {
            rate: vars.parsed::<Decimal>("TDS_RATE", flat.rate)?,
            exemption_limit: vars.parsed::<Decimal>("TDS_EXEMPTION_LIMIT", flat.exemption_limit)?,
        }),
        "slab" => Arc::new(SlabTds::parse(&vars.required("TDS_SLABS")?)?),
        other => return Err(anyhow!("TDS_POLICY must be none, flat or slab (got {:?})", other)),
    };

    Ok(StatutoryConfig {
        pf_rate: vars.parsed("PF_RATE", defaults.pf_rate)?,
        esi_employee_rate: vars.parsed("ESI_EMPLOYEE_RATE", defaults.esi_employee_rate)?,
        esi_wage_limit: vars.parsed("ESI_WAGE_LIMIT", defaults.esi_wage_limit)?,
        professional_tax: vars.parsed("PROFESSIONAL_TAX", defaults.professional_tax)?,
        tds,
    })
}

fn remarks_from<F: Fn(&str) -> Option<String>>(vars: &Vars<'_, F>) -> anyhow::Result<RemarkSettings> {
    let defaults = RemarkSettings::default();

    Ok(RemarkSettings {
        api_key: vars.optional("GEMINI_API_KEY"),
        model: vars.optional("GEMINI_MODEL").unwrap_or(defaults.model),
        base_url: vars.optional("GEMINI_BASE_URL"),
        timeout: Duration::from_secs(
            vars.parsed("REMARK_TIMEOUT_SECS", defaults.timeout.as_secs())?,
        ),
        cache_ttl: Duration::from_secs(
            vars.parsed("REMARK_CACHE_TTL_SECS", defaults.cache_ttl.as_secs())?,
        ),
        cache_capacity: vars.parsed("REMARK_CACHE_CAPACITY", defaults.cache_capacity)?,
    })
}
