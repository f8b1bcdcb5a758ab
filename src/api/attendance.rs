use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::attendance::AttendanceStatus;
use crate::payroll::period::PayPeriod;
use crate::payroll::service::PayrollService;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "2025-11-03", value_type = String, format = Date)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Month as YYYY-MM
    #[param(value_type = String, example = "2025-11")]
    pub month: PayPeriod,
    /// Restrict to one employee; employees always see only their own marks
    pub employee_id: Option<String>,
}

/// Marks (or re-marks) one employee's attendance for a day
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance marked", body = crate::model::attendance::AttendanceMark),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    body: web::Json<MarkAttendance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let MarkAttendance {
        employee_id,
        date,
        status,
    } = body.into_inner();

    let mark = service.mark_attendance(&employee_id, date, status).await?;

    Ok(HttpResponse::Ok().json(mark))
}

/// Attendance marks for a month
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Marks ordered by date, then employee", body = Vec<crate::model::attendance::AttendanceMark>),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let AttendanceQuery { month, employee_id } = query.into_inner();

    let employee_id = if auth.is_employee() {
        let own = auth
            .employee_id
            .clone()
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;
        auth.require_self_or_hr(employee_id.as_deref().unwrap_or(&own))?;
        Some(own)
    } else {
        auth.require_hr_or_admin()?;
        employee_id
    };

    let marks = service.attendance(month, employee_id.as_deref()).await?;

    Ok(HttpResponse::Ok().json(marks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::testing::issue_token;
    use crate::models::TokenType;
    use crate::test_support::{JWT_SECRET, StaticRemark, employee, memory_service, rajesh, test_config};
    use actix_web::{App, http::StatusCode, test, web::Data};
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    fn bearer(role: u8, employee_id: Option<&str>) -> (&'static str, String) {
        (
            "Authorization",
            format!("Bearer {}", issue_token(role, employee_id, TokenType::Access, JWT_SECRET)),
        )
    }

    fn service() -> Data<PayrollService> {
        let (service, _) = memory_service(
            vec![rajesh(), employee("EMP002", dec!(30000))],
            StaticRemark::ok("ok"),
        );
        Data::new(service)
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(Data::new(test_config()))
                    .app_data($service.clone())
                    .route("/attendance", web::post().to(mark_attendance))
                    .route("/attendance", web::get().to(list_attendance)),
            )
            .await
        };
    }

    fn mark(employee_id: &str, date: &str, status: &str) -> Value {
        json!({ "employeeId": employee_id, "date": date, "status": status })
    }

    #[actix_web::test]
    async fn hr_marks_attendance() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(bearer(2, None))
            .set_json(mark("EMP001", "2025-11-03", "Half Day"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["employeeId"], "EMP001");
        assert_eq!(body["date"], "2025-11-03");
        assert_eq!(body["status"], "Half Day");
    }

    #[actix_web::test]
    async fn employees_cannot_mark_attendance() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(bearer(3, Some("EMP001")))
            .set_json(mark("EMP001", "2025-11-03", "Present"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_status_or_employee_is_rejected() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(bearer(1, None))
            .set_json(mark("EMP001", "2025-11-03", "WFH"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/attendance")
            .insert_header(bearer(1, None))
            .set_json(mark("EMP404", "2025-11-03", "Present"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn employees_only_see_their_own_marks() {
        let service = service();
        for id in ["EMP001", "EMP002"] {
            service
                .mark_attendance(
                    id,
                    NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
                    AttendanceStatus::Present,
                )
                .await
                .unwrap();
        }
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/attendance?month=2025-11")
            .insert_header(bearer(2, None))
            .to_request();
        let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 2);

        let req = test::TestRequest::get()
            .uri("/attendance?month=2025-11")
            .insert_header(bearer(3, Some("EMP002")))
            .to_request();
        let own: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(own.len(), 1);
        assert_eq!(own[0]["employeeId"], "EMP002");

        let req = test::TestRequest::get()
            .uri("/attendance?month=2025-11&employeeId=EMP001")
            .insert_header(bearer(3, Some("EMP002")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn invalid_month_is_a_bad_request() {
        let service = service();
        let app = app!(service);

        let req = test::TestRequest::get()
            .uri("/attendance?month=2025-1")
            .insert_header(bearer(2, None))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
