//! Login and registration inputs.
//!
//! Handlers build these values from request bodies; services only ever see
//! validated credentials.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use zeroize::Zeroizing;

use super::{EmployeeValidationError, Sex};

/// Minimum accepted username length.
pub const USERNAME_MIN: usize = 3;
/// Maximum accepted username length.
pub const USERNAME_MAX: usize = 150;
/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;
/// Longest first or last name the employee store accepts.
pub const NAME_MAX: usize = 100;
/// Longest email address the employee store accepts.
pub const EMAIL_MAX: usize = 200;

/// Reasons a login payload is rejected before authentication.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The username is trimmed; the password is kept verbatim and zeroised on
/// drop.
///
/// # Examples
/// ```
/// use hr_assistant::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" EMP001 ", "secret").unwrap();
/// assert_eq!(creds.username(), "EMP001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username may only contain letters, digits and @.+-_")]
    UsernameCharacters,
    #[error("a valid email address is required")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("first name must not be empty")]
    EmptyFirstName,
    #[error("last name must not be empty")]
    EmptyLastName,
    #[error("first name must be at most {max} characters")]
    FirstNameTooLong { max: usize },
    #[error("last name must be at most {max} characters")]
    LastNameTooLong { max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("birth date must be in the past")]
    BirthDateInFuture,
    #[error(transparent)]
    Identifier(#[from] EmployeeValidationError),
}

impl RegistrationValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UsernameLength { .. } | Self::UsernameCharacters | Self::Identifier(_) => {
                "username"
            }
            Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyFirstName | Self::FirstNameTooLong { .. } => "firstName",
            Self::EmptyLastName | Self::LastNameTooLong { .. } => "lastName",
            Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "passwordConfirmation",
            Self::BirthDateInFuture => "birthDate",
        }
    }
}

/// Raw registration fields.
#[derive(Debug, Clone)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub password_confirmation: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Zeroizing<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

impl Registration {
    /// Validate a registration form against `today`.
    pub fn validate(
        form: RegistrationForm<'_>,
        today: NaiveDate,
    ) -> Result<Self, RegistrationValidationError> {
        let username = form.username.trim();
        let length = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(RegistrationValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !username_regex().is_match(username) {
            return Err(RegistrationValidationError::UsernameCharacters);
        }
        let email = form.email.trim();
        if !is_plausible_email(email) {
            return Err(RegistrationValidationError::InvalidEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(RegistrationValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let first_name = form.first_name.trim();
        if first_name.is_empty() {
            return Err(RegistrationValidationError::EmptyFirstName);
        }
        if first_name.chars().count() > NAME_MAX {
            return Err(RegistrationValidationError::FirstNameTooLong { max: NAME_MAX });
        }
        let last_name = form.last_name.trim();
        if last_name.is_empty() {
            return Err(RegistrationValidationError::EmptyLastName);
        }
        if last_name.chars().count() > NAME_MAX {
            return Err(RegistrationValidationError::LastNameTooLong { max: NAME_MAX });
        }
        if form.password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if form.password != form.password_confirmation {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        if form.birth_date.is_some_and(|date| date >= today) {
            return Err(RegistrationValidationError::BirthDateInFuture);
        }
        Ok(Self {
            username: username.to_owned(),
            email: email.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            password: Zeroizing::new(form.password.to_owned()),
            birth_date: form.birth_date,
            sex: form.sex,
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
