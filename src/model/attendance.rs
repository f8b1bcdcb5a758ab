use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};
use utoipa::ToSchema;

/// Daily attendance mark. Stored in MySQL by its display name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, EnumIter, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[serde(rename = "Half Day")]
    #[strum(serialize = "Half Day")]
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    /// Days of presence credited for one mark. Leave earns no presence credit.
    pub fn present_credit(self) -> Decimal {
        match self {
            AttendanceStatus::Present => Decimal::ONE,
            AttendanceStatus::HalfDay => Decimal::new(5, 1),
            AttendanceStatus::Absent | AttendanceStatus::Leave => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "2025-11-03", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// An attendance record together with the employee it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceMark {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "2025-11-03", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl From<&AttendanceMark> for AttendanceRecord {
    fn from(mark: &AttendanceMark) -> Self {
        AttendanceRecord {
            date: mark.date,
            status: mark.status,
        }
    }
}
