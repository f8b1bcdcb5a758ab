use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::errors::RemarkError;
use crate::model::employee::Employee;

/// Sentence used whenever the remark service cannot answer.
pub const FALLBACK_REMARK: &str = "Thank you for your contribution this month.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// What the remark writer gets to know about a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemarkContext {
    pub employee_name: String,
    pub role: String,
    pub department: String,
    pub attendance_percentage: Decimal,
    pub net_salary: Decimal,
}

impl RemarkContext {
    pub fn new(employee: &Employee, attendance_percentage: Decimal, net_salary: Decimal) -> Self {
        Self {
            employee_name: employee.name.clone(),
            role: employee.role.clone(),
            department: employee.department.clone(),
            attendance_percentage,
            net_salary,
        }
    }
}

#[async_trait]
pub trait RemarkGenerator: Send + Sync {
    async fn generate_remark(&self, context: &RemarkContext) -> Result<String, RemarkError>;
}

#[async_trait]
impl<T: RemarkGenerator + ?Sized> RemarkGenerator for Arc<T> {
    async fn generate_remark(&self, context: &RemarkContext) -> Result<String, RemarkError> {
        (**self).generate_remark(context).await
    }
}

/// Replaces any failure of the inner generator with [`FALLBACK_REMARK`].
pub struct WithFallback<G> {
    inner: G,
}

impl<G: RemarkGenerator> WithFallback<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub async fn remark(&self, context: &RemarkContext) -> String {
        match self.inner.generate_remark(context).await {
            Ok(remark) => remark,
            Err(e) => {
                warn!(error = %e, employee = %context.employee_name, "Remark generation failed, using fallback");
                FALLBACK_REMARK.to_string()
            }
        }
    }
}

#[async_trait]
impl<G: RemarkGenerator> RemarkGenerator for WithFallback<G> {
    async fn generate_remark(&self, context: &RemarkContext) -> Result<String, RemarkError> {
        Ok(self.remark(context).await)
    }
}

/// Remembers answers per context so a regenerated payslip reuses its remark.
pub struct CachedRemarks<G> {
    inner: G,
    cache: Cache<RemarkContext, String>,
}

impl<G: RemarkGenerator> CachedRemarks<G> {
    pub fn new(inner: G, capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }
}

#[async_trait]
impl<G: RemarkGenerator> RemarkGenerator for CachedRemarks<G> {
    async fn generate_remark(&self, context: &RemarkContext) -> Result<String, RemarkError> {
        if let Some(remark) = self.cache.get(context).await {
            debug!(employee = %context.employee_name, "Remark served from cache");
            return Ok(remark);
        }

        // failures are not cached
        let remark = self.inner.generate_remark(context).await?;
        self.cache.insert(context.clone(), remark.clone()).await;
        Ok(remark)
    }
}

/// Stand-in when no remark service is configured.
#[derive(Debug, Default)]
pub struct UnconfiguredRemarks;

#[async_trait]
impl RemarkGenerator for UnconfiguredRemarks {
    async fn generate_remark(&self, _context: &RemarkContext) -> Result<String, RemarkError> {
        Err(RemarkError::Unavailable("no remark service configured".into()))
    }
}

/// Writes remarks with Google Gemini's `generateContent` endpoint.
pub struct GeminiRemarkGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiRemarkGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, RemarkError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

pub(crate) fn remark_prompt(context: &RemarkContext) -> String {
    format!(
        "You are an HR Manager writing a short, professional, and encouraging remark for an employee's payslip.\n\
         \n\
         Employee Details:\n\
         - Name: {}\n\
         - Role: {}\n\
         - Department: {}\n\
         - Attendance: {:.1}%\n\
         - Net Salary: \u{20b9}{}\n\
         \n\
         Context:\n\
         - If attendance is > 95%, praise their consistency.\n\
         - If attendance is low, gently encourage better work-life balance or health.\n\
         - Mention their specific role or department value briefly.\n\
         - Keep it under 25 words.\n\
         - Do not use markdown. Just plain text.",
        context.employee_name,
        context.role,
        context.department,
        context.attendance_percentage,
        context.net_salary,
    )
}

#[async_trait]
impl RemarkGenerator for GeminiRemarkGenerator {
    async fn generate_remark(&self, context: &RemarkContext) -> Result<String, RemarkError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": remark_prompt(context) }] }]
        });

        let response: GenerateContentResponse = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .into_text()
            .ok_or_else(|| RemarkError::Unavailable("empty response from remark service".into()))
    }
}

/// Remark service settings read from the environment.
#[derive(Debug, Clone)]
pub struct RemarkSettings {
    pub api_key: Option<String>,
    pub model: String,
    /// Overrides the public Gemini endpoint, e.g. for an egress proxy
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Default for RemarkSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            timeout: Duration::from_secs(8),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 10_000,
        }
    }
}

pub fn build_remark_generator(
    settings: &RemarkSettings,
) -> Result<Arc<dyn RemarkGenerator>, RemarkError> {
    match &settings.api_key {
        Some(key) if !key.trim().is_empty() => {
            let mut gemini =
                GeminiRemarkGenerator::new(key.clone(), settings.model.clone(), settings.timeout)?;
            if let Some(base_url) = &settings.base_url {
                gemini = gemini.with_base_url(base_url.trim_end_matches('/'));
            }
            Ok(Arc::new(CachedRemarks::new(
                gemini,
                settings.cache_capacity,
                settings.cache_ttl,
            )))
        }
        _ => Ok(Arc::new(UnconfiguredRemarks)),
    }
}
