//! Driving port for authentication.
//!
//! Inbound adapters call this port to turn credentials into an employee
//! identifier without knowing how passwords are stored.

use async_trait::async_trait;

use crate::domain::{EmployeeId, Error, LoginCredentials};

/// Authentication use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated employee's id.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller: both yield `401 invalid credentials`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<EmployeeId, Error>;
}
