//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `400 invalid_request` with `details.field` naming
//! the camelCase request field and `details.code` a stable reason.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{ChatId, EmployeeId, Error, Sex};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidUuid,
    InvalidIdentifier,
    InvalidDate,
    InvalidChoice,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::InvalidDate => "invalid_date",
            Self::InvalidChoice => "invalid_choice",
        }
    }
}

/// Request field name as clients see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// `400` error pointing at `field`.
pub(crate) fn field_error(
    field: FieldName,
    code: &str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

fn invalid_value(field: FieldName, code: ValidationCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_chat_id(value: &str, field: FieldName) -> Result<ChatId, Error> {
    Uuid::parse_str(value).map(ChatId::from_uuid).map_err(|_| {
        invalid_value(
            field,
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_employee_id(value: &str, field: FieldName) -> Result<EmployeeId, Error> {
    EmployeeId::new(value).map_err(|err| {
        invalid_value(
            field,
            ValidationCode::InvalidIdentifier,
            format!("{}: {err}", field.as_str()),
            value,
        )
    })
}

/// Parse an optional `YYYY-MM-DD` date; blank strings count as absent.
pub(crate) fn parse_optional_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid_value(
                    field,
                    ValidationCode::InvalidDate,
                    format!("{} must be a YYYY-MM-DD date", field.as_str()),
                    raw,
                )
            }),
    }
}

/// Parse an optional sex label; blank strings count as absent.
pub(crate) fn parse_optional_sex(value: Option<&str>, field: FieldName) -> Result<Option<Sex>, Error> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => Sex::from_str(raw).map(Some).map_err(|_| {
            invalid_value(
                field,
                ValidationCode::InvalidChoice,
                format!("{} must be one of male, female, other", field.as_str()),
                raw,
            )
        }),
    }
}
