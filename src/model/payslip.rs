use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Earnings {
    #[schema(value_type = f64, example = 45000)]
    pub basic: Decimal,
    #[schema(value_type = f64, example = 18000)]
    pub hra: Decimal,
    #[schema(value_type = f64, example = 4500)]
    pub da: Decimal,
    #[schema(value_type = f64, example = 5000)]
    pub special_allowance: Decimal,
    #[schema(value_type = f64, example = 72500)]
    pub gross: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    /// Provident fund, employee share on basic
    #[schema(value_type = f64, example = 5400)]
    pub pf: Decimal,
    /// Employee state insurance
    #[schema(value_type = f64, example = 0)]
    pub esi: Decimal,
    /// Professional tax
    #[schema(value_type = f64, example = 200)]
    pub pt: Decimal,
    /// Tax deducted at source
    #[schema(value_type = f64, example = 0)]
    pub tax: Decimal,
    #[schema(value_type = f64, example = 5600)]
    pub total_deductions: Decimal,
}

/// One generated payslip. Immutable once created; regeneration produces a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "5f0c3c1e-8d7a-4a57-9a53-0d3cf3b1c8a2",
    "employeeId": "EMP001",
    "month": "2025-11",
    "year": 2025,
    "generatedDate": "2025-11-30T10:15:00Z",
    "attendancePercentage": 100.0,
    "earnings": {"basic": 45000, "hra": 18000, "da": 4500, "specialAllowance": 5000, "gross": 72500},
    "deductions": {"pf": 5400, "esi": 0, "pt": 200, "tax": 0, "totalDeductions": 5600},
    "netSalary": 66900,
    "remarks": "Consistent attendance all month, thank you for anchoring the engineering team."
}))]
pub struct Payslip {
    pub id: String,
    pub employee_id: String,
    /// Year-month, e.g. `2025-11`
    pub month: String,
    pub year: i32,
    #[schema(value_type = String, format = "date-time")]
    pub generated_date: DateTime<Utc>,
    #[schema(value_type = f64)]
    pub attendance_percentage: Decimal,
    pub earnings: Earnings,
    pub deductions: Deductions,
    /// May be negative when a tax policy outweighs earnings.
    #[schema(value_type = f64)]
    pub net_salary: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
