use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollError {
    #[error("{component} must not be negative (got {amount})")]
    NegativeComponent {
        component: &'static str,
        amount: Decimal,
    },

    #[error("Attendance percentage must be within 0..=100 (got {0})")]
    AttendanceOutOfRange(Decimal),

    #[error("Days in month must be positive (got {0})")]
    NonPositiveDaysInMonth(u32),

    #[error("{0} exceeds the representable amount")]
    AmountOverflow(&'static str),

    #[error("Invalid pay period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid statutory configuration: {0}")]
    InvalidStatutoryConfig(String),

    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("Payslip not found: {0}")]
    PayslipNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PayrollError {
    /// Bad input that must be fixed before the call is retried.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            PayrollError::NegativeComponent { .. }
                | PayrollError::AttendanceOutOfRange(_)
                | PayrollError::NonPositiveDaysInMonth(_)
                | PayrollError::AmountOverflow(_)
                | PayrollError::InvalidPeriod(_)
                | PayrollError::InvalidStatutoryConfig(_)
        )
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::EmployeeNotFound(_) | PayrollError::PayslipNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            err if err.is_configuration_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PayrollError::Store(e) => {
                tracing::error!(error = %e, "Payroll storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Failure of the remark-generation collaborator. Never fatal to payroll.
#[derive(Error, Debug, Clone)]
pub enum RemarkError {
    #[error("Remark service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for RemarkError {
    fn from(err: reqwest::Error) -> Self {
        RemarkError::Unavailable(err.to_string())
    }
}
