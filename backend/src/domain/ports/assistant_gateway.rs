//! Driven port for the hosted conversational assistant.

use std::sync::Arc;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures talking to the assistant service. All of them are recovered
    /// by the rule-based responder.
    pub enum AssistantGatewayError {
        /// The service could not be reached or timed out.
        Transport { message: String } => "assistant transport error: {message}",
        /// The service answered with an error status.
        Rejected { status: u16, message: String } =>
            "assistant rejected request ({status}): {message}",
        /// The run finished in a failed state.
        RunFailed { status: String } => "assistant run ended with status {status}",
        /// The run did not finish within the polling budget.
        Timeout { attempts: u32 } => "assistant run still pending after {attempts} polls",
        /// The run completed without an assistant message.
        EmptyReply => "assistant produced no reply",
        /// The response body could not be decoded.
        Decode { message: String } => "assistant response decode failed: {message}",
    }
}

/// Sends a prompt to the assistant and returns its reply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Submit `prompt` to the assistant thread.
    async fn submit(&self, prompt: &str) -> Result<String, AssistantGatewayError>;
}

/// Whether an assistant service is available to this process.
///
/// Chosen once at start-up from configuration.
#[derive(Clone, Default)]
pub enum AssistantCapability {
    /// A gateway is configured and will be attempted first.
    Configured(Arc<dyn AssistantGateway>),
    /// No gateway; every reply comes from the rule-based responder.
    #[default]
    Unconfigured,
}

impl AssistantCapability {
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

impl std::fmt::Debug for AssistantCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured(_) => f.write_str("AssistantCapability::Configured"),
            Self::Unconfigured => f.write_str("AssistantCapability::Unconfigured"),
        }
    }
}
