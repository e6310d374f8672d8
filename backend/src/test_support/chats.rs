use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{ChatRepository, ChatRepositoryError};
use crate::domain::{Chat, ChatId, EmployeeId, Message};

#[derive(Default)]
struct ChatState {
    chats: Vec<Chat>,
    messages: Vec<Message>,
}

/// Chat store kept in memory. Messages keep insertion order among equal
/// timestamps.
#[derive(Default)]
pub struct InMemoryChatRepository {
    state: Mutex<ChatState>,
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let mut state = lock(&self.state);
        if state.chats.iter().any(|existing| existing.id == chat.id) {
            return Err(ChatRepositoryError::query("duplicate chat id"));
        }
        state.chats.push(chat.clone());
        Ok(())
    }

    async fn find_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<Option<Chat>, ChatRepositoryError> {
        Ok(lock(&self.state)
            .chats
            .iter()
            .find(|chat| chat.id == *id && chat.owner == *owner)
            .cloned())
    }

    async fn list_owned(&self, owner: &EmployeeId) -> Result<Vec<Chat>, ChatRepositoryError> {
        let mut owned: Vec<Chat> = lock(&self.state)
            .chats
            .iter()
            .filter(|chat| chat.owner == *owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(owned)
    }

    async fn update(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let mut state = lock(&self.state);
        let stored = state
            .chats
            .iter_mut()
            .find(|existing| existing.id == chat.id)
            .ok_or_else(|| ChatRepositoryError::query("chat not found for update"))?;
        stored.title.clone_from(&chat.title);
        stored.updated_at = chat.updated_at;
        Ok(())
    }

    async fn delete_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<bool, ChatRepositoryError> {
        let mut state = lock(&self.state);
        let before = state.chats.len();
        state
            .chats
            .retain(|chat| !(chat.id == *id && chat.owner == *owner));
        let deleted = state.chats.len() < before;
        if deleted {
            state.messages.retain(|message| message.chat_id != *id);
        }
        Ok(deleted)
    }

    async fn append_message(&self, message: &Message) -> Result<(), ChatRepositoryError> {
        let mut state = lock(&self.state);
        if !state.chats.iter().any(|chat| chat.id == message.chat_id) {
            return Err(ChatRepositoryError::query("message references unknown chat"));
        }
        state.messages.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatRepositoryError> {
        let mut messages: Vec<Message> = lock(&self.state)
            .messages
            .iter()
            .filter(|message| message.chat_id == *chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|message| message.created_at);
        Ok(messages)
    }

    async fn count_messages(&self, chat_id: &ChatId) -> Result<u64, ChatRepositoryError> {
        let count = lock(&self.state)
            .messages
            .iter()
            .filter(|message| message.chat_id == *chat_id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
