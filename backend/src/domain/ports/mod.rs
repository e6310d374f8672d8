//! Domain ports.
//!
//! Driving ports (`LoginService`, `RegistrationCommand`, `EmployeesQuery`,
//! `ChatCommand`, `ChatQuery`) are what inbound adapters call. Driven ports
//! (`EmployeeRepository`, `ChatRepository`, `AssistantGateway`,
//! `PasswordHasher`) are what outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod assistant_gateway;
mod chat_command;
mod chat_query;
mod chat_repository;
mod employee_repository;
mod employees_query;
mod login_service;
mod password_hasher;
mod registration_command;

#[cfg(test)]
pub use assistant_gateway::MockAssistantGateway;
pub use assistant_gateway::{AssistantCapability, AssistantGateway, AssistantGatewayError};
#[cfg(test)]
pub use chat_command::MockChatCommand;
pub use chat_command::{ChatCommand, SendMessageRequest, SendMessageResponse};
#[cfg(test)]
pub use chat_query::MockChatQuery;
pub use chat_query::ChatQuery;
#[cfg(test)]
pub use chat_repository::MockChatRepository;
pub use chat_repository::{ChatRepository, ChatRepositoryError};
#[cfg(test)]
pub use employee_repository::MockEmployeeRepository;
pub use employee_repository::{
    DepartmentHeadcount, EmployeeRepository, EmployeeRepositoryError, UpsertOutcome,
};
#[cfg(test)]
pub use employees_query::MockEmployeesQuery;
pub use employees_query::EmployeesQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
