//! Chat use-cases.
//!
//! `send_message` persists the user's message, asks the assistant for a
//! reply when one is configured, and falls back to the rule-based responder
//! on any assistant failure. The two message writes are independent; a
//! failure between them leaves the user message stored without a reply.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::fallback::FallbackResponder;
use crate::domain::ports::{
    AssistantCapability, AssistantGateway, AssistantGatewayError, ChatCommand, ChatQuery,
    ChatRepository, ChatRepositoryError, EmployeeRepository, EmployeeRepositoryError,
    SendMessageRequest, SendMessageResponse,
};
use crate::domain::{
    Chat, ChatId, ContextAssembler, Employee, EmployeeId, Error, Message, Sender, derive_title,
    format_employee_listing,
};

/// Why the assistant path was abandoned for a message.
#[derive(Debug, thiserror::Error)]
enum AssistantFailure {
    #[error("context assembly failed: {0}")]
    Context(#[from] EmployeeRepositoryError),
    #[error(transparent)]
    Gateway(#[from] AssistantGatewayError),
}

/// Chat service implementing [`ChatCommand`] and [`ChatQuery`].
pub struct ChatService<E, C> {
    employees: Arc<E>,
    chats: Arc<C>,
    assistant: AssistantCapability,
    clock: Arc<dyn Clock>,
    context: ContextAssembler<E>,
    fallback: FallbackResponder<E>,
}

impl<E, C> Clone for ChatService<E, C> {
    fn clone(&self) -> Self {
        Self {
            employees: Arc::clone(&self.employees),
            chats: Arc::clone(&self.chats),
            assistant: self.assistant.clone(),
            clock: Arc::clone(&self.clock),
            context: self.context.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<E, C> ChatService<E, C>
where
    E: EmployeeRepository,
    C: ChatRepository,
{
    /// Create a service over the given stores.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use hr_assistant::domain::ChatService;
    /// # use hr_assistant::domain::ports::AssistantCapability;
    /// # use hr_assistant::test_support::{InMemoryChatRepository, InMemoryEmployeeRepository};
    /// let service = ChatService::new(
    ///     Arc::new(InMemoryEmployeeRepository::default()),
    ///     Arc::new(InMemoryChatRepository::default()),
    ///     AssistantCapability::Unconfigured,
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        employees: Arc<E>,
        chats: Arc<C>,
        assistant: AssistantCapability,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            context: ContextAssembler::new(Arc::clone(&employees)),
            fallback: FallbackResponder::new(Arc::clone(&employees)),
            employees,
            chats,
            assistant,
            clock,
        }
    }

    fn map_chat_error(error: ChatRepositoryError) -> Error {
        match error {
            ChatRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("chat repository unavailable: {message}"))
            }
            ChatRepositoryError::Query { message } => {
                Error::internal(format!("chat repository error: {message}"))
            }
        }
    }

    fn map_employee_error(error: EmployeeRepositoryError) -> Error {
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

    fn chat_not_found(chat_id: &ChatId) -> Error {
        Error::not_found(format!("chat {chat_id} not found"))
    }

    async fn owned_chat(&self, owner: &EmployeeId, chat_id: &ChatId) -> Result<Chat, Error> {
        self.chats
            .find_owned(chat_id, owner)
            .await
            .map_err(Self::map_chat_error)?
            .ok_or_else(|| Self::chat_not_found(chat_id))
    }

    async fn requester(&self, id: &EmployeeId) -> Result<Employee, Error> {
        self.employees
            .find_by_id(id)
            .await
            .map_err(Self::map_employee_error)?
            .ok_or_else(|| Error::unauthorized("session does not match an employee"))
    }

    async fn ask_assistant(
        &self,
        gateway: &dyn AssistantGateway,
        requester: &Employee,
        content: &str,
    ) -> Result<String, AssistantFailure> {
        let prompt = self.context.enhanced_message(Some(requester), content).await?;
        let reply = gateway.submit(&prompt).await?;
        Ok(format_employee_listing(&reply))
    }

    /// Assistant reply when available, otherwise the rule-based one.
    async fn compose_reply(&self, requester: &Employee, content: &str) -> Result<String, Error> {
        if let AssistantCapability::Configured(gateway) = &self.assistant {
            match self.ask_assistant(gateway.as_ref(), requester, content).await {
                Ok(reply) => return Ok(reply),
                Err(reason) => {
                    warn!(
                        employee_id = %requester.id(),
                        error = %reason,
                        "assistant unavailable, answering with rules"
                    );
                }
            }
        }
        self.fallback
            .respond(content, Some(requester))
            .await
            .map_err(Self::map_employee_error)
    }
}

#[async_trait]
impl<E, C> ChatCommand for ChatService<E, C>
where
    E: EmployeeRepository,
    C: ChatRepository,
{
    async fn create_chat(&self, owner: &EmployeeId) -> Result<Chat, Error> {
        let chat = Chat::start(owner.clone(), self.clock.utc());
        self.chats
            .create(&chat)
            .await
            .map_err(Self::map_chat_error)?;
        info!(chat_id = %chat.id, employee_id = %owner, "chat created");
        Ok(chat)
    }

    async fn delete_chat(&self, owner: &EmployeeId, chat_id: &ChatId) -> Result<(), Error> {
        let deleted = self
            .chats
            .delete_owned(chat_id, owner)
            .await
            .map_err(Self::map_chat_error)?;
        if deleted {
            info!(chat_id = %chat_id, employee_id = %owner, "chat deleted");
            Ok(())
        } else {
            Err(Self::chat_not_found(chat_id))
        }
    }

    async fn send_message(&self, request: SendMessageRequest) -> Result<SendMessageResponse, Error> {
        let SendMessageRequest {
            chat_id,
            requester,
            content,
        } = request;
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::invalid_request("message must not be empty").with_details(json!({
                "field": "content",
                "code": "empty_message",
            })));
        }

        let mut chat = self.owned_chat(&requester, &chat_id).await?;
        let employee = self.requester(&requester).await?;

        let is_first = self
            .chats
            .count_messages(&chat.id)
            .await
            .map_err(Self::map_chat_error)?
            == 0;

        let user_message = Message::new(chat.id, Sender::User, content, self.clock.utc());
        self.chats
            .append_message(&user_message)
            .await
            .map_err(Self::map_chat_error)?;

        let reply = self.compose_reply(&employee, content).await?;
        let assistant_message = Message::new(chat.id, Sender::Assistant, reply, self.clock.utc());
        self.chats
            .append_message(&assistant_message)
            .await
            .map_err(Self::map_chat_error)?;

        if is_first {
            chat.title = derive_title(content);
        }
        chat.updated_at = assistant_message.created_at;
        self.chats
            .update(&chat)
            .await
            .map_err(Self::map_chat_error)?;

        Ok(SendMessageResponse {
            chat,
            user_message,
            assistant_message,
        })
    }
}

#[async_trait]
impl<E, C> ChatQuery for ChatService<E, C>
where
    E: EmployeeRepository,
    C: ChatRepository,
{
    async fn list_chats(&self, owner: &EmployeeId) -> Result<Vec<Chat>, Error> {
        self.chats
            .list_owned(owner)
            .await
            .map_err(Self::map_chat_error)
    }

    async fn list_messages(
        &self,
        owner: &EmployeeId,
        chat_id: &ChatId,
    ) -> Result<Vec<Message>, Error> {
        let chat = self.owned_chat(owner, chat_id).await?;
        self.chats
            .list_messages(&chat.id)
            .await
            .map_err(Self::map_chat_error)
    }
}

#[cfg(test)]
#[path = "chat_service_tests.rs"]
mod tests;
