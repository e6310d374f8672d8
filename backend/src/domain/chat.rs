//! Conversations between an employee and the assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EmployeeId;

/// Title given to a chat before its first message.
pub const DEFAULT_CHAT_TITLE: &str = "Nouvelle conversation";
/// Number of characters kept when deriving a title from a message.
pub const TITLE_MAX_CHARS: usize = 50;

/// Chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse a storage label.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A chat owned by one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub owner: EmployeeId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Start an untitled chat.
    pub fn start(owner: EmployeeId, now: DateTime<Utc>) -> Self {
        Self {
            id: ChatId::random(),
            owner,
            title: DEFAULT_CHAT_TITLE.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single message in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: ChatId,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        chat_id: ChatId,
        sender: Sender,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            sender,
            content: content.into(),
            created_at,
        }
    }
}

/// Derive a short chat title from the first message.
///
/// Whitespace runs collapse to single spaces; text longer than
/// [`TITLE_MAX_CHARS`] characters is cut and suffixed with `...`.
///
/// # Examples
/// ```
/// use hr_assistant::domain::derive_title;
///
/// assert_eq!(derive_title("  Combien de  congés ?"), "Combien de congés ?");
/// assert!(derive_title(&"a".repeat(80)).ends_with("..."));
/// ```
pub fn derive_title(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return DEFAULT_CHAT_TITLE.to_owned();
    }
    if collapsed.chars().count() <= TITLE_MAX_CHARS {
        return collapsed;
    }
    let mut title: String = collapsed.chars().take(TITLE_MAX_CHARS).collect();
    title.push_str("...");
    title
}
