//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in `inbound::http`, the request and
//! response DTOs they use, the error schema wrappers and the session cookie
//! security scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::chats::{
    ChatResponse, ExchangeResponse, MessageResponse, SendMessageBody,
};
use crate::inbound::http::employees::{
    AnnualLeaveResponse, CompensationResponse, EmployeeResponse, PrivateDetailsResponse,
    SickLeaveResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "HR assistant API",
        description = "Employee directory, conversations with the HR assistant, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::current_employee,
        crate::inbound::http::employees::list_employees,
        crate::inbound::http::employees::get_employee,
        crate::inbound::http::chats::list_chats,
        crate::inbound::http::chats::create_chat,
        crate::inbound::http::chats::delete_chat,
        crate::inbound::http::chats::list_messages,
        crate::inbound::http::chats::send_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        EmployeeResponse,
        PrivateDetailsResponse,
        AnnualLeaveResponse,
        SickLeaveResponse,
        CompensationResponse,
        ChatResponse,
        MessageResponse,
        SendMessageBody,
        ExchangeResponse,
    )),
    tags(
        (name = "auth", description = "Login, logout, registration and own profile"),
        (name = "employees", description = "Employee directory filtered by access policy"),
        (name = "chats", description = "Conversations with the HR assistant"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_code_message_and_trace_id() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");
        for field in ["code", "message", "traceId", "details"] {
            assert!(object_has_field(error, field), "missing {field}");
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/register")]
    #[case("/api/v1/me")]
    #[case("/api/v1/employees/{id}")]
    #[case("/api/v1/chats")]
    #[case("/api/v1/chats/{id}")]
    #[case("/api/v1/chats/{id}/messages")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn employee_schema_keeps_private_fields_optional() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let employee = schemas.get("EmployeeResponse").expect("EmployeeResponse schema");
        assert!(object_has_field(employee, "private"));
        assert!(object_has_field(employee, "disclosure"));
        match employee {
            RefOr::T(Schema::Object(obj)) => {
                assert!(!obj.required.iter().any(|name| name == "private"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
