//! Driving port for self-service account creation.

use async_trait::async_trait;

use crate::domain::{Employee, Error, Registration};

/// Registration use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Create an employee account. Clashing usernames or identifiers yield
    /// `409 conflict`.
    async fn register(&self, registration: Registration) -> Result<Employee, Error>;
}
