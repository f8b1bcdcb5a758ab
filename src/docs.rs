use crate::api::attendance::MarkAttendance;
use crate::api::payroll::GeneratePayslip;
use crate::model::attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};
use crate::model::employee::{Employee, SalaryStructure};
use crate::model::payslip::{Deductions, Earnings, Payslip};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Payroll API",
        version = "1.0.0",
        description = r#"
## Payroll for the HRM system

Turns a month of attendance marks and an employee's salary structure into a payslip.

### Key Features
- **Employees**
  - Browse the directory and each employee's salary structure
- **Attendance**
  - Mark Present, Absent, Half Day or Leave per employee per day
  - List a month's marks
- **Payslips**
  - Prorate earnings by attendance
  - Deduct PF, ESI, professional tax and TDS
  - Attach a short performance remark, falling back to a fixed message
  - Browse an employee's payslip history, newest first

### Security
Every endpoint requires a **JWT Bearer** access token.
Only **Admin** and **HR** can mark attendance or generate payslips; employees can read their own records.

### Amounts
Amounts are whole rupees; each earning head and deduction is rounded half away from zero.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::list_attendance,

        crate::api::payroll::generate_payslip,
        crate::api::payroll::payslip_history,
        crate::api::payroll::get_payslip
    ),
    components(
        schemas(
            AttendanceStatus,
            AttendanceRecord,
            AttendanceMark,
            MarkAttendance,
            Employee,
            SalaryStructure,
            Earnings,
            Deductions,
            Payslip,
            GeneratePayslip
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Employee", description = "Read-only employee directory APIs"),
        (name = "Attendance", description = "Attendance marking APIs"),
        (name = "Payroll", description = "Payslip generation and history APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
