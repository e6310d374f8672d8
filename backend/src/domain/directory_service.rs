//! Directory reads filtered through the access policy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{EmployeeRepository, EmployeeRepositoryError, EmployeesQuery};
use crate::domain::{Disclosure, Employee, EmployeeId, EmployeeView, Error};

/// Service implementing [`EmployeesQuery`].
#[derive(Clone)]
pub struct DirectoryService<E> {
    employees: Arc<E>,
}

impl<E> DirectoryService<E> {
    pub fn new(employees: Arc<E>) -> Self {
        Self { employees }
    }
}

impl<E> DirectoryService<E>
where
    E: EmployeeRepository,
{
    fn map_repository_error(error: EmployeeRepositoryError) -> Error {
        match error {
            EmployeeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("employee repository unavailable: {message}"))
            }
            EmployeeRepositoryError::Query { message }
            | EmployeeRepositoryError::Duplicate { message } => {
                Error::internal(format!("employee repository error: {message}"))
            }
        }
    }

    async fn load(&self, id: &EmployeeId) -> Result<Option<Employee>, Error> {
        self.employees
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn load_requester(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.load(id)
            .await?
            .ok_or_else(|| Error::unauthorized("session does not match an employee"))
    }
}

#[async_trait]
impl<E> EmployeesQuery for DirectoryService<E>
where
    E: EmployeeRepository,
{
    async fn profile(&self, requester: &EmployeeId) -> Result<EmployeeView, Error> {
        let me = self.load_requester(requester).await?;
        EmployeeView::at_level(Disclosure::Full, &me)
            .ok_or_else(|| Error::internal("own profile withheld"))
    }

    async fn directory(&self, requester: &EmployeeId) -> Result<Vec<EmployeeView>, Error> {
        let me = self.load_requester(requester).await?;
        let everyone = self
            .employees
            .list_all()
            .await
            .map_err(Self::map_repository_error)?;
        Ok(everyone
            .iter()
            .filter_map(|target| EmployeeView::for_requester(Some(&me), target))
            .collect())
    }

    async fn employee(
        &self,
        requester: &EmployeeId,
        target: &EmployeeId,
    ) -> Result<EmployeeView, Error> {
        let me = self.load_requester(requester).await?;
        let not_found = || Error::not_found(format!("employee {target} not found"));
        let found = self.load(target).await?.ok_or_else(not_found)?;
        EmployeeView::for_requester(Some(&me), &found).ok_or_else(not_found)
    }
}
