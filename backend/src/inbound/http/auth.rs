//! Account handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"EMP001","password":"..."}
//! POST /api/v1/logout
//! POST /api/v1/register {"username":"jdoe","email":"jdoe@company.com",...}
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Disclosure, EmployeeView, Error, LoginCredentials, LoginValidationError, Registration,
    RegistrationForm, RegistrationValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::employees::EmployeeResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_error, parse_optional_date, parse_optional_sex,
};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "EMP001")]
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Registration request body for `POST /api/v1/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@company.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    #[schema(example = "1990-04-12")]
    pub birth_date: Option<String>,
    /// `male`, `female` or `other`.
    #[serde(default)]
    pub sex: Option<String>,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => field_error(
            FieldName::new("username"),
            "empty_username",
            "username must not be empty",
        ),
        LoginValidationError::EmptyPassword => field_error(
            FieldName::new("password"),
            "empty_password",
            "password must not be empty",
        ),
    }
}

fn registration_error_code(err: &RegistrationValidationError) -> &'static str {
    match err {
        RegistrationValidationError::UsernameLength { .. } => "invalid_length",
        RegistrationValidationError::UsernameCharacters => "invalid_characters",
        RegistrationValidationError::InvalidEmail => "invalid_email",
        RegistrationValidationError::EmailTooLong { .. }
        | RegistrationValidationError::FirstNameTooLong { .. }
        | RegistrationValidationError::LastNameTooLong { .. } => "too_long",
        RegistrationValidationError::EmptyFirstName | RegistrationValidationError::EmptyLastName => {
            "empty_field"
        }
        RegistrationValidationError::PasswordTooShort { .. } => "password_too_short",
        RegistrationValidationError::PasswordMismatch => "password_mismatch",
        RegistrationValidationError::BirthDateInFuture => "birth_date_in_future",
        RegistrationValidationError::Identifier(_) => "invalid_identifier",
    }
}

fn map_registration_error(err: RegistrationValidationError) -> Error {
    field_error(
        FieldName::new(err.field()),
        registration_error_code(&err),
        err.to_string(),
    )
}

fn parse_registration(payload: &RegisterRequest) -> Result<Registration, Error> {
    let birth_date =
        parse_optional_date(payload.birth_date.as_deref(), FieldName::new("birthDate"))?;
    let sex = parse_optional_sex(payload.sex.as_deref(), FieldName::new("sex"))?;
    let form = RegistrationForm {
        username: &payload.username,
        email: &payload.email,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        password: &payload.password,
        password_confirmation: &payload.password_confirmation,
        birth_date,
        sex,
    };
    Registration::validate(form, Utc::now().date_naive()).map_err(map_registration_error)
}

/// Authenticate an employee and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Employee store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let employee_id = state.login.authenticate(&credentials).await?;
    session.persist_employee(&employee_id)?;
    info!(employee_id = %employee_id, "employee logged in");
    Ok(HttpResponse::Ok().finish())
}

/// End the current session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Create an account. The identifier is the upper-cased username.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = EmployeeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "Employee store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(&payload)?;
    let employee = state.registration.register(registration).await?;
    let view = EmployeeView::at_level(Disclosure::Full, &employee)
        .ok_or_else(|| Error::internal("registered employee cannot be rendered"))?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(view)))
}

/// The caller's own record in full.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Own profile", body = EmployeeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentEmployee"
)]
#[get("/me")]
pub async fn current_employee(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<EmployeeResponse>> {
    let employee_id = session.require_employee_id()?;
    let view = state.employees.profile(&employee_id).await?;
    Ok(web::Json(EmployeeResponse::from(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, EmployeeDraft, EmployeeId};
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn register_body() -> Value {
        json!({
            "username": "jdoe",
            "email": "jdoe@company.com",
            "firstName": "Jean",
            "lastName": "Doe",
            "password": "motdepasse",
            "passwordConfirmation": "motdepasse",
        })
    }

    async fn error_details(res: actix_web::dev::ServiceResponse) -> (String, String, String) {
        let body: Value = test::read_body_json(res).await;
        let text = |value: &Value| value.as_str().unwrap_or_default().to_owned();
        (
            text(&body["code"]),
            text(&body["details"]["field"]),
            text(&body["details"]["code"]),
        )
    }

    #[rstest]
    #[case("   ", "secret", "username", "empty_username")]
    #[case("EMP001", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = test::init_service(test_app(MockPorts::default().into_state())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginRequest {
                    username: username.to_owned(),
                    password: password.to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let (top, detail_field, detail_code) = error_details(res).await;
        assert_eq!(top, "invalid_request");
        assert_eq!(detail_field, field);
        assert_eq!(detail_code, code);
    }

    #[actix_web::test]
    async fn login_sets_a_session_cookie() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .withf(|creds| creds.username() == "EMP001" && creds.password() == "secret")
            .return_once(|_| Ok(EmployeeId::new("EMP001").expect("id")));
        let app = test::init_service(test_app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"username": " EMP001 ", "password": "secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_cookie(&res).is_some());
    }

    #[actix_web::test]
    async fn wrong_credentials_are_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_| Err(Error::unauthorized("invalid credentials")));
        let app = test::init_service(test_app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"username": "EMP001", "password": "nope"}))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(session_cookie(&res).is_none());
    }

    #[actix_web::test]
    async fn logout_then_me_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_| Ok(EmployeeId::new("EMP001").expect("id")));
        let app = test::init_service(test_app(ports.into_state())).await;

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({"username": "EMP001", "password": "secret"}))
                .to_request(),
        )
        .await;
        let cookie = session_cookie(&login_res).expect("session cookie");

        let logout_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
        let cleared = session_cookie(&logout_res).expect("removal cookie");

        let me = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/me").cookie(cleared).to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("password", json!("court"), "password", "password_too_short")]
    #[case("passwordConfirmation", json!("autrechose"), "passwordConfirmation", "password_mismatch")]
    #[case("email", json!("jdoe"), "email", "invalid_email")]
    #[case("username", json!("jd"), "username", "invalid_length")]
    #[case("birthDate", json!("12/04/1990"), "birthDate", "invalid_date")]
    #[case("lastName", json!("a".repeat(150)), "lastName", "too_long")]
    #[actix_web::test]
    async fn registration_reports_the_offending_field(
        #[case] key: &str,
        #[case] value: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = test::init_service(test_app(MockPorts::default().into_state())).await;
        let mut body = register_body();
        body[key] = value;
        if key == "password" {
            body["passwordConfirmation"] = body["password"].clone();
        }

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let (_, detail_field, detail_code) = error_details(res).await;
        assert_eq!(detail_field, field);
        assert_eq!(detail_code, code);
    }

    #[actix_web::test]
    async fn registration_returns_the_full_record() {
        let mut ports = MockPorts::default();
        ports
            .registration
            .expect_register()
            .withf(|registration| registration.username == "jdoe")
            .return_once(|registration| {
                let mut draft =
                    EmployeeDraft::new(EmployeeId::new("JDOE").expect("id"), registration.username);
                draft.email = registration.email;
                draft.first_name = registration.first_name;
                draft.last_name = registration.last_name;
                Ok(Employee::new(draft).expect("employee"))
            });
        let app = test::init_service(test_app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["id"], "JDOE");
        assert_eq!(body["disclosure"], "full");
        assert_eq!(body["private"]["annualLeave"]["entitlement"], 25.0);
    }

    #[actix_web::test]
    async fn duplicate_usernames_conflict() {
        let mut ports = MockPorts::default();
        ports
            .registration
            .expect_register()
            .return_once(|_| Err(Error::conflict("username already taken")));
        let app = test::init_service(test_app(ports.into_state())).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }
}
