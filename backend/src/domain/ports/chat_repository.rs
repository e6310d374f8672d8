//! Driven port for chats and their messages.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, EmployeeId, Message};

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat store adapters.
    pub enum ChatRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "chat repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "chat repository query failed: {message}",
    }
}

/// Persistence port for chats.
///
/// Every chat-scoped read filters by owner so one employee can never load
/// another employee's conversation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Store a new chat.
    async fn create(&self, chat: &Chat) -> Result<(), ChatRepositoryError>;

    /// Load a chat if it exists and belongs to `owner`.
    async fn find_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<Option<Chat>, ChatRepositoryError>;

    /// Chats owned by `owner`, most recently updated first.
    async fn list_owned(&self, owner: &EmployeeId) -> Result<Vec<Chat>, ChatRepositoryError>;

    /// Persist title and `updated_at` changes.
    async fn update(&self, chat: &Chat) -> Result<(), ChatRepositoryError>;

    /// Delete a chat and its messages. Returns `false` when nothing matched.
    async fn delete_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<bool, ChatRepositoryError>;

    /// Append a message.
    async fn append_message(&self, message: &Message) -> Result<(), ChatRepositoryError>;

    /// Messages of a chat in creation order.
    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatRepositoryError>;

    /// Number of messages stored for a chat.
    async fn count_messages(&self, chat_id: &ChatId) -> Result<u64, ChatRepositoryError>;
}
