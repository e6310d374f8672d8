//! Driving port for directory reads filtered by the access policy.

use async_trait::async_trait;

use crate::domain::{EmployeeId, EmployeeView, Error};

/// Directory read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeesQuery: Send + Sync {
    /// The requester's own record in full.
    async fn profile(&self, requester: &EmployeeId) -> Result<EmployeeView, Error>;

    /// Every employee as seen by the requester.
    async fn directory(&self, requester: &EmployeeId) -> Result<Vec<EmployeeView>, Error>;

    /// One employee as seen by the requester.
    async fn employee(
        &self,
        requester: &EmployeeId,
        target: &EmployeeId,
    ) -> Result<EmployeeView, Error>;
}
