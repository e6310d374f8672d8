//! PostgreSQL-backed `ChatRepository` implementation using Diesel ORM.
//!
//! Chat reads always filter on `owner_id`; messages are read back in
//! `(created_at, seq)` order so two messages stamped with the same instant
//! keep their insertion order.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ChatRepository, ChatRepositoryError};
use crate::domain::{Chat, ChatId, EmployeeId, Message, Sender};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ChatRow, ChatUpdate, MessageRow, NewChatRow, NewMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::{chats, messages};

/// Diesel-backed implementation of the `ChatRepository` port.
#[derive(Clone)]
pub struct DieselChatRepository {
    pool: DbPool,
}

impl DieselChatRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChatRepositoryError {
    map_basic_pool_error(error, ChatRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ChatRepositoryError {
    map_basic_diesel_error(
        error,
        ChatRepositoryError::query,
        ChatRepositoryError::connection,
    )
}

fn row_to_chat(row: ChatRow) -> Result<Chat, ChatRepositoryError> {
    let owner = EmployeeId::new(row.owner_id)
        .map_err(|err| ChatRepositoryError::query(format!("stored chat owner: {err}")))?;
    Ok(Chat {
        id: ChatId::from_uuid(row.id),
        owner,
        title: row.title,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_message(row: MessageRow) -> Result<Message, ChatRepositoryError> {
    let sender = Sender::from_label(&row.sender).ok_or_else(|| {
        ChatRepositoryError::query(format!("stored message sender: {}", row.sender))
    })?;
    Ok(Message {
        id: row.id,
        chat_id: ChatId::from_uuid(row.chat_id),
        sender,
        content: row.content,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ChatRepository for DieselChatRepository {
    async fn create(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewChatRow {
            id: *chat.id.as_uuid(),
            owner_id: chat.owner.as_str(),
            title: &chat.title,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        };
        diesel::insert_into(chats::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<Option<Chat>, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ChatRow> = chats::table
            .filter(chats::id.eq(id.as_uuid()))
            .filter(chats::owner_id.eq(owner.as_str()))
            .select(ChatRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_chat).transpose()
    }

    async fn list_owned(&self, owner: &EmployeeId) -> Result<Vec<Chat>, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ChatRow> = chats::table
            .filter(chats::owner_id.eq(owner.as_str()))
            .order((chats::updated_at.desc(), chats::created_at.desc()))
            .select(ChatRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_chat).collect()
    }

    async fn update(&self, chat: &Chat) -> Result<(), ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ChatUpdate {
            title: &chat.title,
            updated_at: chat.updated_at,
        };
        let updated = diesel::update(chats::table.filter(chats::id.eq(chat.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(ChatRepositoryError::query("chat not found for update"));
        }
        Ok(())
    }

    async fn delete_owned(
        &self,
        id: &ChatId,
        owner: &EmployeeId,
    ) -> Result<bool, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            chats::table
                .filter(chats::id.eq(id.as_uuid()))
                .filter(chats::owner_id.eq(owner.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn append_message(&self, message: &Message) -> Result<(), ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMessageRow {
            id: message.id,
            chat_id: *message.chat_id.as_uuid(),
            sender: message.sender.as_str(),
            content: &message.content,
            created_at: message.created_at,
        };
        diesel::insert_into(messages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<MessageRow> = messages::table
            .filter(messages::chat_id.eq(chat_id.as_uuid()))
            .order((messages::created_at.asc(), messages::seq.asc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_message).collect()
    }

    async fn count_messages(&self, chat_id: &ChatId) -> Result<u64, ChatRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = messages::table
            .filter(messages::chat_id.eq(chat_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
