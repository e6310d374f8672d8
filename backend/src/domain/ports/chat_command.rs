//! Driving port for chat mutations.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, EmployeeId, Error, Message};

/// Input for [`ChatCommand::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageRequest {
    pub chat_id: ChatId,
    pub requester: EmployeeId,
    pub content: String,
}

/// Both halves of an exchange, plus the chat as it stands afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageResponse {
    pub chat: Chat,
    pub user_message: Message,
    pub assistant_message: Message,
}

/// Chat mutation use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// Start a new, untitled chat.
    async fn create_chat(&self, owner: &EmployeeId) -> Result<Chat, Error>;

    /// Delete a chat owned by `owner`.
    async fn delete_chat(&self, owner: &EmployeeId, chat_id: &ChatId) -> Result<(), Error>;

    /// Record a user message and the assistant's reply.
    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse, Error>;
}
