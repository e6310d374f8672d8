//! Employee directory handlers.
//!
//! ```text
//! GET /api/v1/employees
//! GET /api/v1/employees/EMP042
//! ```
//!
//! Every record goes through the access policy before it is rendered, so the
//! response only carries `private` for the caller's own record and for their
//! direct reports.

use actix_web::{get, web};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AnnualLeave, Compensation, Disclosure, EmployeeView, PrivateDetails, SickLeave};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_employee_id};

/// One employee as the caller is allowed to see them.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    #[schema(example = "EMP042")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[schema(example = "IT")]
    pub department: Option<String>,
    pub job_title: String,
    /// `full` or `directory`.
    #[schema(example = "directory")]
    pub disclosure: String,
    /// Present only under `full` disclosure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateDetailsResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrivateDetailsResponse {
    pub manager_id: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub annual_leave: AnnualLeaveResponse,
    pub sick_leave: SickLeaveResponse,
    pub compensation: CompensationResponse,
}

/// Annual leave counters in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnualLeaveResponse {
    pub entitlement: f64,
    pub used: f64,
    pub planned: f64,
    pub remaining: f64,
}

/// Sick leave counters in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SickLeaveResponse {
    pub entitlement: f64,
    pub used: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompensationResponse {
    pub salary: f64,
    pub bonus_eligible: bool,
    pub next_review_date: Option<NaiveDate>,
    #[schema(example = "Standard")]
    pub benefits_tier: String,
}

fn disclosure_label(disclosure: Disclosure) -> &'static str {
    match disclosure {
        Disclosure::Full => "full",
        Disclosure::Directory => "directory",
        Disclosure::Withheld => "withheld",
    }
}

impl From<AnnualLeave> for AnnualLeaveResponse {
    fn from(value: AnnualLeave) -> Self {
        Self {
            entitlement: value.entitlement,
            used: value.used,
            planned: value.planned,
            remaining: value.remaining,
        }
    }
}

impl From<SickLeave> for SickLeaveResponse {
    fn from(value: SickLeave) -> Self {
        Self {
            entitlement: value.entitlement,
            used: value.used,
            remaining: value.remaining,
        }
    }
}

impl From<Compensation> for CompensationResponse {
    fn from(value: Compensation) -> Self {
        Self {
            salary: value.salary,
            bonus_eligible: value.bonus_eligible,
            next_review_date: value.next_review_date,
            benefits_tier: value.benefits_tier.label().to_owned(),
        }
    }
}

impl From<PrivateDetails> for PrivateDetailsResponse {
    fn from(value: PrivateDetails) -> Self {
        Self {
            manager_id: value.manager_id.map(String::from),
            hire_date: value.hire_date,
            annual_leave: value.annual_leave.into(),
            sick_leave: value.sick_leave.into(),
            compensation: value.compensation.into(),
        }
    }
}

impl From<EmployeeView> for EmployeeResponse {
    fn from(value: EmployeeView) -> Self {
        Self {
            id: value.id.into(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            department: value.department.map(|department| department.label().to_owned()),
            job_title: value.job_title,
            disclosure: disclosure_label(value.disclosure).to_owned(),
            private: value.private.map(PrivateDetailsResponse::from),
        }
    }
}

/// List the directory as seen by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employees ordered by identifier", body = [EmployeeResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Employee store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "listEmployees"
)]
#[get("/employees")]
pub async fn list_employees(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<EmployeeResponse>>> {
    let requester = session.require_employee_id()?;
    let views = state.employees.directory(&requester).await?;
    Ok(web::Json(views.into_iter().map(EmployeeResponse::from).collect()))
}

/// Fetch one employee as seen by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    params(("id" = String, Path, description = "Employee identifier")),
    responses(
        (status = 200, description = "Employee", body = EmployeeResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown employee", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["employees"],
    operation_id = "getEmployee"
)]
#[get("/employees/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let requester = session.require_employee_id()?;
    let target = parse_employee_id(&path.into_inner(), FieldName::new("id"))?;
    let view = state.employees.employee(&requester, &target).await?;
    Ok(web::Json(EmployeeResponse::from(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Department, EmployeeId, Error};
    use crate::inbound::http::test_utils::{MockPorts, login_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::Value;

    fn directory_view(id: &str, first: &str) -> EmployeeView {
        EmployeeView {
            id: EmployeeId::new(id).expect("id"),
            first_name: first.to_owned(),
            last_name: "Martin".to_owned(),
            email: format!("{}@company.com", id.to_lowercase()),
            department: Some(Department::It),
            job_title: "Développeur".to_owned(),
            disclosure: Disclosure::Directory,
            private: None,
        }
    }

    #[actix_web::test]
    async fn directory_views_omit_private_fields() {
        let json = serde_json::to_value(EmployeeResponse::from(directory_view("EMP002", "Paul")))
            .expect("json");
        assert_eq!(json["department"], "IT");
        assert_eq!(json["disclosure"], "directory");
        assert!(json.get("private").is_none());
        assert!(json.get("salary").is_none());
    }

    #[actix_web::test]
    async fn full_views_expose_leave_and_pay() {
        let mut view = directory_view("EMP001", "Marie");
        view.disclosure = Disclosure::Full;
        view.private = Some(PrivateDetails {
            manager_id: None,
            hire_date: NaiveDate::from_ymd_opt(2020, 1, 6),
            annual_leave: AnnualLeave {
                entitlement: 25.0,
                used: 8.0,
                planned: 2.0,
                remaining: 15.0,
            },
            sick_leave: SickLeave::default(),
            compensation: Compensation::default(),
        });
        let json = serde_json::to_value(EmployeeResponse::from(view)).expect("json");
        assert_eq!(json["private"]["annualLeave"]["remaining"], 15.0);
        assert_eq!(json["private"]["hireDate"], "2020-01-06");
        assert_eq!(json["private"]["compensation"]["benefitsTier"], "Standard");
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = test::init_service(test_app(MockPorts::default().into_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/employees").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn listing_returns_filtered_views() {
        let mut ports = MockPorts::default();
        ports
            .employees
            .expect_directory()
            .withf(|requester| requester.as_str() == "EMP001")
            .times(1)
            .return_once(|_| Ok(vec![directory_view("EMP002", "Paul")]));
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app, "EMP001").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/employees")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["id"], "EMP002");
        assert_eq!(body[0]["firstName"], "Paul");
    }

    #[actix_web::test]
    async fn unknown_employees_are_not_found() {
        let mut ports = MockPorts::default();
        ports
            .employees
            .expect_employee()
            .return_once(|_, target| Err(Error::not_found(format!("employee {target} not found"))));
        let app = test::init_service(test_app(ports.into_state())).await;
        let cookie = login_cookie(&app, "EMP001").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/employees/EMP999")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
