//! HTTP server configuration object.

use std::net::SocketAddr;

use hr_assistant::domain::ports::AssistantCapability;
use hr_assistant::inbound::http::session_config::SessionSettings;
use hr_assistant::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) assistant: AssistantCapability,
}

impl ServerConfig {
    /// Configuration with the assistant unconfigured.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            session,
            bind_addr,
            db_pool,
            assistant: AssistantCapability::Unconfigured,
        }
    }

    /// Route replies through `assistant` before the built-in responder.
    #[must_use]
    pub fn with_assistant(mut self, assistant: AssistantCapability) -> Self {
        self.assistant = assistant;
        self
    }
}
