//! Domain primitives, policies and services.
//!
//! Purpose: model employees and conversations, decide what each requester
//! may see, and produce assistant replies. Nothing here knows about HTTP or
//! SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Employee, EmployeeId, Department: HR records and identifiers.
//! - Chat, Message: conversations.
//! - disclosure_for / EmployeeView: the access policy.
//! - ContextAssembler, format_employee_listing, FallbackResponder: reply
//!   pipeline.
//! - ChatService, AccountService, DirectoryService, EmployeeImporter,
//!   NameSimplifier: use-case services.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod chat;
pub mod chat_service;
pub mod context;
pub mod directory_service;
pub mod employee;
pub mod error;
pub mod fallback;
pub mod import;
pub mod listing_format;
pub mod name_simplification;
pub mod ports;
pub mod trace_id;

pub use self::access::{
    Disclosure, EmployeeView, PrivateDetails, disclosure_for, permission_summary,
};
pub use self::account_service::AccountService;
pub use self::auth::{
    EMAIL_MAX, LoginCredentials, LoginValidationError, NAME_MAX, PASSWORD_MIN, Registration, RegistrationForm,
    RegistrationValidationError, USERNAME_MAX, USERNAME_MIN,
};
pub use self::chat::{
    Chat, ChatId, DEFAULT_CHAT_TITLE, Message, Sender, TITLE_MAX_CHARS, derive_title,
};
pub use self::chat_service::ChatService;
pub use self::context::{BriefingInputs, ContextAssembler, FORMATTING_INSTRUCTIONS, build_briefing};
pub use self::directory_service::DirectoryService;
pub use self::employee::{
    AnnualLeave, BenefitsTier, Compensation, Department, EMPLOYEE_ID_MAX, Employee, EmployeeDraft,
    EmployeeId, EmployeeValidationError, Role, Sex, SickLeave, fold_text, format_number,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::fallback::FallbackResponder;
pub use self::import::{EmployeeImporter, ImportError, ImportSummary};
pub use self::listing_format::format_employee_listing;
pub use self::name_simplification::{
    NameChange, NameSimplifier, has_composed_name, plan_name_changes, simplify_name,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use hr_assistant::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
