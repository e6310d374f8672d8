use std::sync::Mutex;

use async_trait::async_trait;

use super::lock;
use crate::domain::ports::{AssistantGateway, AssistantGatewayError};

/// Gateway answering every prompt with the same reply and recording the
/// prompts it received.
#[derive(Default)]
pub struct StaticAssistantGateway {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StaticAssistantGateway {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts submitted so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl AssistantGateway for StaticAssistantGateway {
    async fn submit(&self, prompt: &str) -> Result<String, AssistantGatewayError> {
        lock(&self.prompts).push(prompt.to_owned());
        Ok(self.reply.clone())
    }
}

/// Gateway whose every call fails with a transport error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAssistantGateway;

#[async_trait]
impl AssistantGateway for FailingAssistantGateway {
    async fn submit(&self, _prompt: &str) -> Result<String, AssistantGatewayError> {
        Err(AssistantGatewayError::transport("assistant unreachable"))
    }
}
