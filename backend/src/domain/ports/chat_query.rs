//! Driving port for chat reads.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, EmployeeId, Error, Message};

/// Chat read use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatQuery: Send + Sync {
    /// Chats owned by `owner`, most recently updated first.
    async fn list_chats(&self, owner: &EmployeeId) -> Result<Vec<Chat>, Error>;

    /// Messages of an owned chat in creation order.
    async fn list_messages(&self, owner: &EmployeeId, chat_id: &ChatId)
    -> Result<Vec<Message>, Error>;
}
