//! Wire types for the hosted agent/thread API.
//!
//! Only the fields the gateway reads are modelled; everything else in the
//! service's responses is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct CreateMessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRunDto<'a> {
    pub(super) assistant_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct RunDto {
    pub(super) id: String,
    pub(super) status: String,
}

/// Run states reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RunState {
    Pending,
    Failed,
    Finished,
}

impl RunDto {
    pub(super) fn state(&self) -> RunState {
        match self.status.as_str() {
            "queued" | "in_progress" => RunState::Pending,
            "failed" | "cancelled" | "expired" => RunState::Failed,
            _ => RunState::Finished,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct MessageListDto {
    #[serde(default)]
    pub(super) data: Vec<ThreadMessageDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ThreadMessageDto {
    pub(super) role: String,
    #[serde(default)]
    pub(super) content: Vec<ContentPartDto>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ContentPartDto {
    Text { text: TextValueDto },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub(super) struct TextValueDto {
    pub(super) value: String,
}

impl MessageListDto {
    /// Text of the newest assistant message; the list is requested newest
    /// first. Text parts are joined with blank lines.
    pub(super) fn latest_assistant_text(&self) -> Option<String> {
        let message = self.data.iter().find(|message| message.role == "assistant")?;
        let parts: Vec<&str> = message
            .content
            .iter()
            .filter_map(|part| match part {
                ContentPartDto::Text { text } => Some(text.value.trim()),
                ContentPartDto::Other => None,
            })
            .filter(|text| !text.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AgentDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ThreadDto {
    pub(super) id: String,
}
