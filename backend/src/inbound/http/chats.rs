//! Chat handlers.
//!
//! ```text
//! GET    /api/v1/chats
//! POST   /api/v1/chats
//! DELETE /api/v1/chats/{id}
//! GET    /api/v1/chats/{id}/messages
//! POST   /api/v1/chats/{id}/messages {"content":"Combien de jours de congés me reste-t-il ?"}
//! ```
//!
//! Chats belonging to someone else answer `404`, exactly like chats that do
//! not exist.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{SendMessageRequest, SendMessageResponse};
use crate::domain::{Chat, Message};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_chat_id};

const CHAT_ID_FIELD: FieldName = FieldName::new("id");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: Uuid,
    #[schema(example = "Nouvelle conversation")]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(value: Chat) -> Self {
        Self {
            id: *value.id.as_uuid(),
            title: value.title,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    /// `user` or `assistant`.
    #[schema(example = "assistant")]
    pub sender: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            chat_id: *value.chat_id.as_uuid(),
            sender: value.sender.as_str().to_owned(),
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// Body of `POST /api/v1/chats/{id}/messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// Blank content is rejected with `details.code = "empty_message"`.
    #[serde(default)]
    pub content: String,
}

/// Both halves of an exchange and the chat as it now stands.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub chat: ChatResponse,
    pub user_message: MessageResponse,
    pub assistant_message: MessageResponse,
}

impl From<SendMessageResponse> for ExchangeResponse {
    fn from(value: SendMessageResponse) -> Self {
        Self {
            chat: value.chat.into(),
            user_message: value.user_message.into(),
            assistant_message: value.assistant_message.into(),
        }
    }
}

/// List the caller's chats, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/chats",
    responses(
        (status = 200, description = "Chats", body = [ChatResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Chat store unavailable", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "listChats"
)]
#[get("/chats")]
pub async fn list_chats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ChatResponse>>> {
    let owner = session.require_employee_id()?;
    let chats = state.chat_query.list_chats(&owner).await?;
    Ok(web::Json(chats.into_iter().map(ChatResponse::from).collect()))
}

/// Start a new, untitled chat.
#[utoipa::path(
    post,
    path = "/api/v1/chats",
    responses(
        (status = 201, description = "Chat created", body = ChatResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Chat store unavailable", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "createChat"
)]
#[post("/chats")]
pub async fn create_chat(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let owner = session.require_employee_id()?;
    let chat = state.chats.create_chat(&owner).await?;
    Ok(HttpResponse::Created().json(ChatResponse::from(chat)))
}

/// Delete one of the caller's chats with its messages.
#[utoipa::path(
    delete,
    path = "/api/v1/chats/{id}",
    params(("id" = Uuid, Path, description = "Chat identifier")),
    responses(
        (status = 204, description = "Chat deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown chat", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "deleteChat"
)]
#[delete("/chats/{id}")]
pub async fn delete_chat(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_employee_id()?;
    let chat_id = parse_chat_id(&path.into_inner(), CHAT_ID_FIELD)?;
    state.chats.delete_chat(&owner, &chat_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Messages of one chat in chronological order.
#[utoipa::path(
    get,
    path = "/api/v1/chats/{id}/messages",
    params(("id" = Uuid, Path, description = "Chat identifier")),
    responses(
        (status = 200, description = "Messages", body = [MessageResponse]),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown chat", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "listMessages"
)]
#[get("/chats/{id}/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MessageResponse>>> {
    let owner = session.require_employee_id()?;
    let chat_id = parse_chat_id(&path.into_inner(), CHAT_ID_FIELD)?;
    let messages = state.chat_query.list_messages(&owner, &chat_id).await?;
    Ok(web::Json(
        messages.into_iter().map(MessageResponse::from).collect(),
    ))
}

/// Post a message and receive the assistant's reply.
///
/// The reply comes from the hosted assistant when it is configured and
/// answers; otherwise from the built-in responder. Either way the exchange
/// succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/chats/{id}/messages",
    params(("id" = Uuid, Path, description = "Chat identifier")),
    request_body = SendMessageBody,
    responses(
        (status = 201, description = "Exchange recorded", body = ExchangeResponse),
        (status = 400, description = "Empty message or malformed body", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown chat", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "sendMessage"
)]
#[post("/chats/{id}/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SendMessageBody>,
) -> ApiResult<HttpResponse> {
    let requester = session.require_employee_id()?;
    let chat_id = parse_chat_id(&path.into_inner(), CHAT_ID_FIELD)?;
    let exchange = state
        .chats
        .send_message(SendMessageRequest {
            chat_id,
            requester,
            content: payload.into_inner().content,
        })
        .await?;
    Ok(HttpResponse::Created().json(ExchangeResponse::from(exchange)))
}

#[cfg(test)]
#[path = "chats_tests.rs"]
mod tests;
