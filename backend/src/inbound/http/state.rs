//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever talk to driving
//! ports, so they can be exercised against mocks or in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    ChatCommand, ChatQuery, EmployeesQuery, LoginService, RegistrationCommand,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use hr_assistant::domain::ports::AssistantCapability;
/// use hr_assistant::domain::{AccountService, ChatService, DirectoryService};
/// use hr_assistant::inbound::http::state::HttpState;
/// use hr_assistant::test_support::{
///     InMemoryChatRepository, InMemoryEmployeeRepository, PlaintextPasswordHasher,
/// };
///
/// let employees = Arc::new(InMemoryEmployeeRepository::default());
/// let accounts = Arc::new(AccountService::new(
///     Arc::clone(&employees),
///     Arc::new(PlaintextPasswordHasher),
/// ));
/// let chats = Arc::new(ChatService::new(
///     Arc::clone(&employees),
///     Arc::new(InMemoryChatRepository::default()),
///     AssistantCapability::Unconfigured,
///     Arc::new(DefaultClock),
/// ));
/// let state = HttpState {
///     login: accounts.clone(),
///     registration: accounts,
///     employees: Arc::new(DirectoryService::new(employees)),
///     chats: chats.clone(),
///     chat_query: chats,
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub employees: Arc<dyn EmployeesQuery>,
    pub chats: Arc<dyn ChatCommand>,
    pub chat_query: Arc<dyn ChatQuery>,
}
