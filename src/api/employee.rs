use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::auth::AuthUser;
use crate::payroll::service::PayrollService;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeQuery {
    /// Matches id, name or department
    #[param(example = "engineering")]
    pub search: Option<String>,
}

/// Employee directory
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employees ordered by id", body = Vec<crate::model::employee::Employee>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    // employees only ever see their own entry
    if auth.is_employee() {
        let own = auth
            .employee_id
            .as_deref()
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;
        let employee = service.employee(own).await?;
        return Ok(HttpResponse::Ok().json(vec![employee]));
    }
    auth.require_hr_or_admin()?;

    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let employees = service.employees(search).await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// One employee with salary structure
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", description = "Employee ID")
    ),
    responses(
        (status = 200, body = crate::model::employee::Employee),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    service: web::Data<PayrollService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_hr(&employee_id)?;

    let employee = service.employee(&employee_id).await?;

    Ok(HttpResponse::Ok().json(employee))
}
