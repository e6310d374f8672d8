//! Process configuration loaded via OrthoConfig.
//!
//! Every field can come from a CLI flag, an `HR_ASSISTANT_*` environment
//! variable or a configuration file. Values are kept raw here; the accessor
//! methods apply defaults and validate.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::outbound::assistant::{
    AssistantEndpoint, DEFAULT_API_VERSION, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT,
};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("HR_ASSISTANT_DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("invalid assistant endpoint '{value}': {message}")]
    InvalidAssistantEndpoint { value: String, message: String },
    #[error("HR_ASSISTANT_POOL_SIZE must be at least 1")]
    EmptyPool,
}

/// Runtime settings for the server and the maintenance binaries.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HR_ASSISTANT")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    #[ortho_config(default = DEFAULT_POOL_SIZE)]
    pub pool_size: u32,
    /// Hosted assistant project endpoint.
    pub assistant_endpoint: Option<String>,
    pub assistant_agent_id: Option<String>,
    pub assistant_thread_id: Option<String>,
    pub assistant_api_key: Option<String>,
    pub assistant_api_version: Option<String>,
    /// Per-request timeout in seconds.
    pub assistant_timeout_secs: Option<u64>,
    /// Pause between run-status polls in milliseconds.
    pub assistant_poll_interval_ms: Option<u64>,
    pub assistant_max_polls: Option<u32>,
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("pool_size", &self.pool_size)
            .field("assistant_endpoint", &self.assistant_endpoint)
            .field("assistant_agent_id", &self.assistant_agent_id)
            .field("assistant_thread_id", &self.assistant_thread_id)
            .field(
                "assistant_api_key",
                &self.assistant_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("assistant_api_version", &self.assistant_api_version)
            .field("assistant_timeout_secs", &self.assistant_timeout_secs)
            .field("assistant_poll_interval_ms", &self.assistant_poll_interval_ms)
            .field("assistant_max_polls", &self.assistant_max_polls)
            .finish()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl AppSettings {
    /// Listen address, `0.0.0.0:8080` unless configured.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidBindAddr`] when the value is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = present(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// Pool configuration for the database.
    ///
    /// # Errors
    ///
    /// Fails when no database URL is configured or the pool size is zero.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = present(self.database_url.as_ref()).ok_or(SettingsError::MissingDatabaseUrl)?;
        if self.pool_size == 0 {
            return Err(SettingsError::EmptyPool);
        }
        Ok(PoolConfig::new(url).with_max_size(self.pool_size))
    }

    /// Assistant connection details, or `None` when the assistant is not
    /// configured.
    ///
    /// The assistant counts as configured only when the endpoint, agent and
    /// thread are all set. A partial configuration is logged and ignored.
    ///
    /// # Errors
    ///
    /// [`SettingsError::InvalidAssistantEndpoint`] when the endpoint is not
    /// an absolute URL.
    pub fn assistant_endpoint(&self) -> Result<Option<AssistantEndpoint>, SettingsError> {
        let endpoint = present(self.assistant_endpoint.as_ref());
        let agent = present(self.assistant_agent_id.as_ref());
        let thread = present(self.assistant_thread_id.as_ref());

        let (endpoint, agent, thread) = match (endpoint, agent, thread) {
            (Some(endpoint), Some(agent), Some(thread)) => (endpoint, agent, thread),
            (None, None, None) => return Ok(None),
            (endpoint, agent, thread) => {
                warn!(
                    endpoint = endpoint.is_some(),
                    agent_id = agent.is_some(),
                    thread_id = thread.is_some(),
                    "assistant partially configured; using the built-in responder"
                );
                return Ok(None);
            }
        };

        let url = Url::parse(endpoint).map_err(|err| SettingsError::InvalidAssistantEndpoint {
            value: endpoint.to_owned(),
            message: err.to_string(),
        })?;

        let mut config = AssistantEndpoint::new(url, agent, thread);
        config.api_key = present(self.assistant_api_key.as_ref()).map(str::to_owned);
        config.api_version = present(self.assistant_api_version.as_ref())
            .unwrap_or(DEFAULT_API_VERSION)
            .to_owned();
        config.timeout = self
            .assistant_timeout_secs
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        config.poll_interval = self
            .assistant_poll_interval_ms
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_millis);
        config.max_polls = self.assistant_max_polls.unwrap_or(DEFAULT_MAX_POLLS);
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings loading.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "HR_ASSISTANT_BIND_ADDR",
        "HR_ASSISTANT_DATABASE_URL",
        "HR_ASSISTANT_POOL_SIZE",
        "HR_ASSISTANT_ASSISTANT_ENDPOINT",
        "HR_ASSISTANT_ASSISTANT_AGENT_ID",
        "HR_ASSISTANT_ASSISTANT_THREAD_ID",
        "HR_ASSISTANT_ASSISTANT_API_KEY",
        "HR_ASSISTANT_ASSISTANT_API_VERSION",
        "HR_ASSISTANT_ASSISTANT_TIMEOUT_SECS",
        "HR_ASSISTANT_ASSISTANT_POLL_INTERVAL_MS",
        "HR_ASSISTANT_ASSISTANT_MAX_POLLS",
    ];

    /// Every known variable, unset unless named in `overrides`.
    fn env_vars(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("hr-assistant")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(env_vars(&[]));
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default bind"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert!(matches!(
            settings.pool_config(),
            Err(SettingsError::MissingDatabaseUrl)
        ));
        assert!(settings.assistant_endpoint().expect("no assistant").is_none());
    }

    #[rstest]
    fn pool_size_defaults_when_only_the_url_is_set() {
        let _guard = lock_env(env_vars(&[(
            "HR_ASSISTANT_DATABASE_URL",
            "postgres://hr@localhost/hr",
        )]));
        let pool = load().pool_config().expect("pool config");
        assert_eq!(pool.max_size(), DEFAULT_POOL_SIZE);
    }

    #[rstest]
    fn zero_pool_size_is_rejected() {
        let _guard = lock_env(env_vars(&[
            ("HR_ASSISTANT_DATABASE_URL", "postgres://hr@localhost/hr"),
            ("HR_ASSISTANT_POOL_SIZE", "0"),
        ]));
        assert!(matches!(load().pool_config(), Err(SettingsError::EmptyPool)));
    }

    #[rstest]
    fn database_settings_come_from_the_environment() {
        let _guard = lock_env(env_vars(&[
            ("HR_ASSISTANT_DATABASE_URL", "postgres://hr@localhost/hr"),
            ("HR_ASSISTANT_POOL_SIZE", "4"),
            ("HR_ASSISTANT_BIND_ADDR", "127.0.0.1:9000"),
        ]));
        let settings = load();
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.database_url(), "postgres://hr@localhost/hr");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(settings.bind_addr().expect("bind").port(), 9000);
    }

    #[rstest]
    fn complete_assistant_settings_build_an_endpoint() {
        let _guard = lock_env(env_vars(&[
            ("HR_ASSISTANT_ASSISTANT_ENDPOINT", "https://agents.example.com/api/"),
            ("HR_ASSISTANT_ASSISTANT_AGENT_ID", "asst_hr"),
            ("HR_ASSISTANT_ASSISTANT_THREAD_ID", "thread_1"),
            ("HR_ASSISTANT_ASSISTANT_API_KEY", "secret"),
            ("HR_ASSISTANT_ASSISTANT_TIMEOUT_SECS", "5"),
            ("HR_ASSISTANT_ASSISTANT_MAX_POLLS", "3"),
        ]));
        let endpoint = load()
            .assistant_endpoint()
            .expect("valid settings")
            .expect("configured");
        assert_eq!(endpoint.agent_id, "asst_hr");
        assert_eq!(endpoint.thread_id, "thread_1");
        assert_eq!(endpoint.api_key.as_deref(), Some("secret"));
        assert_eq!(endpoint.api_version, DEFAULT_API_VERSION);
        assert_eq!(endpoint.timeout, Duration::from_secs(5));
        assert_eq!(endpoint.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(endpoint.max_polls, 3);
    }

    #[rstest]
    #[case(&[("HR_ASSISTANT_ASSISTANT_ENDPOINT", "https://agents.example.com/")])]
    #[case(&[
        ("HR_ASSISTANT_ASSISTANT_ENDPOINT", "https://agents.example.com/"),
        ("HR_ASSISTANT_ASSISTANT_AGENT_ID", "asst_hr"),
    ])]
    #[case(&[("HR_ASSISTANT_ASSISTANT_THREAD_ID", "   ")])]
    fn partial_assistant_settings_leave_it_unconfigured(#[case] vars: &[(&str, &str)]) {
        let _guard = lock_env(env_vars(vars));
        assert!(load().assistant_endpoint().expect("partial is not an error").is_none());
    }

    #[rstest]
    fn relative_assistant_endpoints_are_rejected() {
        let _guard = lock_env(env_vars(&[
            ("HR_ASSISTANT_ASSISTANT_ENDPOINT", "agents/api"),
            ("HR_ASSISTANT_ASSISTANT_AGENT_ID", "asst_hr"),
            ("HR_ASSISTANT_ASSISTANT_THREAD_ID", "thread_1"),
        ]));
        assert!(matches!(
            load().assistant_endpoint(),
            Err(SettingsError::InvalidAssistantEndpoint { .. })
        ));
    }

    #[rstest]
    fn debug_output_redacts_secrets() {
        let _guard = lock_env(env_vars(&[
            ("HR_ASSISTANT_DATABASE_URL", "postgres://hr:pw@localhost/hr"),
            ("HR_ASSISTANT_ASSISTANT_API_KEY", "secret"),
        ]));
        let rendered = format!("{:?}", load());
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("pw@"));
    }
}
