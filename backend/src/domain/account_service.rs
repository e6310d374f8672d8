//! Login and self-service registration.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    EmployeeRepository, EmployeeRepositoryError, LoginService, PasswordHashError, PasswordHasher,
    RegistrationCommand,
};
use crate::domain::{
    Employee, EmployeeDraft, EmployeeId, Error, LoginCredentials, Registration, Role,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service implementing [`LoginService`] and
/// [`RegistrationCommand`].
pub struct AccountService<E, H> {
    employees: Arc<E>,
    hasher: Arc<H>,
}

impl<E, H> Clone for AccountService<E, H> {
    fn clone(&self) -> Self {
        Self {
            employees: Arc::clone(&self.employees),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<E, H> AccountService<E, H> {
    pub fn new(employees: Arc<E>, hasher: Arc<H>) -> Self {
        Self { employees, hasher }
    }
}

impl<E, H> AccountService<E, H>
where
    E: EmployeeRepository,
    H: PasswordHasher,
{
    fn map_repository_error(error: EmployeeRepositoryError) -> Error {
        match error {
            EmployeeRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("employee repository unavailable: {message}"))
            }
            EmployeeRepositoryError::Query { message } => {
                Error::internal(format!("employee repository error: {message}"))
            }
            EmployeeRepositoryError::Duplicate { message } => {
                info!(%message, "registration lost a race for its username");
                Self::username_taken()
            }
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    fn username_taken() -> Error {
        Error::conflict("username already taken").with_details(json!({
            "field": "username",
            "code": "already_exists",
        }))
    }
}

#[async_trait]
impl<E, H> LoginService for AccountService<E, H>
where
    E: EmployeeRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<EmployeeId, Error> {
        let Some(employee) = self
            .employees
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if employee.password_hash().is_empty() {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        match self
            .hasher
            .verify(credentials.password(), employee.password_hash())
        {
            Ok(true) => Ok(employee.id().clone()),
            Ok(false) => Err(Error::unauthorized(INVALID_CREDENTIALS)),
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(employee_id = %employee.id(), %message, "stored password hash is unusable");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            Err(error) => Err(Self::map_hash_error(error)),
        }
    }
}

#[async_trait]
impl<E, H> RegistrationCommand for AccountService<E, H>
where
    E: EmployeeRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<Employee, Error> {
        let id = EmployeeId::new(registration.username.to_uppercase()).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "username",
                "code": "invalid_identifier",
            }))
        })?;

        let username_clash = self
            .employees
            .find_by_username(&registration.username)
            .await
            .map_err(Self::map_repository_error)?;
        let id_clash = self
            .employees
            .find_by_id(&id)
            .await
            .map_err(Self::map_repository_error)?;
        if username_clash.is_some() || id_clash.is_some() {
            return Err(Self::username_taken());
        }

        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(Self::map_hash_error)?;

        let Registration {
            username,
            email,
            first_name,
            last_name,
            birth_date,
            sex,
            ..
        } = registration;
        let mut draft = EmployeeDraft::new(id, username);
        draft.password_hash = password_hash;
        draft.email = email;
        draft.first_name = first_name;
        draft.last_name = last_name;
        draft.birth_date = birth_date;
        draft.sex = sex;
        draft.role = Role::User;
        let employee = Employee::new(draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.employees
            .insert(&employee)
            .await
            .map_err(Self::map_repository_error)?;
        info!(employee_id = %employee.id(), "employee registered");
        Ok(employee)
    }
}
