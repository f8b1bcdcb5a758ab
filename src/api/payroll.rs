use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::payroll::period::PayPeriod;
use crate::payroll::service::PayrollService;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GeneratePayslip {
    /// Pay month; defaults to the current month
    #[schema(example = "2025-11", value_type = Option<String>)]
    #[serde(default)]
    pub month: Option<PayPeriod>,
}

#[utoipa::path(
    post,
    path = "/api/payroll/generate/{employee_id}",
    request_body = GeneratePayslip,
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 201, description = "Payslip generated", body = crate::model::payslip::Payslip),
        (status = 400, description = "Invalid salary structure or month"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payslip(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<String>,
    body: web::Json<GeneratePayslip>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let employee_id = path.into_inner();
    let period = body.month.unwrap_or_else(PayPeriod::current);

    let payslip = service.generate(&employee_id, period).await?;

    Ok(HttpResponse::Created().json(payslip))
}

#[utoipa::path(
    get,
    path = "/api/payroll/employee/{employee_id}",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Payslips, newest first", body = Vec<crate::model::payslip::Payslip>),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn payslip_history(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_hr(&employee_id)?;

    let history = service.history(&employee_id).await?;

    Ok(HttpResponse::Ok().json(history))
}

#[utoipa::path(
    get,
    path = "/api/payroll/view/{payslip_id}",
    params(
        ("payslip_id", description = "Payslip ID")
    ),
    responses(
        (status = 200, body = crate::model::payslip::Payslip),
        (status = 403),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payslip(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let payslip = service.payslip(&path.into_inner()).await?;
    auth.require_self_or_hr(&payslip.employee_id)?;

    Ok(HttpResponse::Ok().json(payslip))
}
