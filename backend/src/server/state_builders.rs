//! Builders wiring Diesel repositories and domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use hr_assistant::domain::ports::AssistantCapability;
use hr_assistant::domain::{AccountService, ChatService, DirectoryService};
use hr_assistant::inbound::http::state::HttpState;
use hr_assistant::outbound::persistence::{DbPool, DieselChatRepository, DieselEmployeeRepository};
use hr_assistant::outbound::security::Argon2PasswordHasher;

/// Build the handler state over one pool.
///
/// The employee repository is shared by every service so that login,
/// directory and reply generation read the same store.
pub(super) fn build_http_state(pool: &DbPool, assistant: AssistantCapability) -> web::Data<HttpState> {
    let employees = Arc::new(DieselEmployeeRepository::new(pool.clone()));
    let chats = Arc::new(DieselChatRepository::new(pool.clone()));

    let accounts = Arc::new(AccountService::new(
        Arc::clone(&employees),
        Arc::new(Argon2PasswordHasher),
    ));
    let conversations = Arc::new(ChatService::new(
        Arc::clone(&employees),
        chats,
        assistant,
        Arc::new(DefaultClock),
    ));
    let directory = Arc::new(DirectoryService::new(employees));

    web::Data::new(HttpState {
        login: accounts.clone(),
        registration: accounts,
        employees: directory,
        chats: conversations.clone(),
        chat_query: conversations,
    })
}
