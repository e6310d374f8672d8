//! Driven port for the employee store.
//!
//! Lookups are deliberately simple filters (by identifier, username, manager
//! link, department, title fragment); the directory is small and callers scan
//! freely.

use async_trait::async_trait;

use crate::domain::{Department, Employee, EmployeeId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by employee store adapters.
    pub enum EmployeeRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "employee repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "employee repository query failed: {message}",
        /// An insert collided with an existing identifier or username.
        Duplicate { message: String } =>
            "employee already exists: {message}",
    }
}

/// Employee head count for one department; `None` groups employees without a
/// department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentHeadcount {
    pub department: Option<Department>,
    pub count: u64,
}

/// Outcome of [`EmployeeRepository::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Persistence port for employee records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Find an employee by identifier.
    async fn find_by_id(&self, id: &EmployeeId)
    -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Find an employee by login name (case-insensitive).
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Employee>, EmployeeRepositoryError>;

    /// Every employee, ordered by identifier.
    async fn list_all(&self) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Employees whose manager link equals `manager_id`.
    async fn list_reports(
        &self,
        manager_id: &EmployeeId,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Employees in `department`, ordered by last then first name.
    async fn list_by_department(
        &self,
        department: Department,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Employees whose job title contains `fragment` (case-insensitive).
    async fn search_by_title(
        &self,
        fragment: &str,
    ) -> Result<Vec<Employee>, EmployeeRepositoryError>;

    /// Head counts grouped by department.
    async fn count_by_department(
        &self,
    ) -> Result<Vec<DepartmentHeadcount>, EmployeeRepositoryError>;

    /// Insert a new record. Fails with
    /// [`EmployeeRepositoryError::Duplicate`] when the identifier or the
    /// username is already taken; existing records are never touched.
    async fn insert(&self, employee: &Employee) -> Result<(), EmployeeRepositoryError>;

    /// Insert or replace a record keyed by identifier.
    async fn upsert(&self, employee: &Employee) -> Result<UpsertOutcome, EmployeeRepositoryError>;
}
