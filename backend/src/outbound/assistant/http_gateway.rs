//! Reqwest-backed assistant gateway.
//!
//! One `submit` call posts the prompt to the configured thread, starts a run
//! for the configured agent, polls the run until it leaves `queued` /
//! `in_progress`, then reads the newest assistant message. Every request
//! carries the bearer token and the `api-version` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    AgentDto, CreateMessageDto, CreateRunDto, MessageListDto, RunDto, RunState, ThreadDto,
};
use crate::domain::ports::{AssistantGateway, AssistantGatewayError};

/// Default `api-version` query value.
pub const DEFAULT_API_VERSION: &str = "v1";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default pause between run-status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of run-status polls before giving up.
pub const DEFAULT_MAX_POLLS: u32 = 30;

/// Connection details for the hosted assistant.
#[derive(Clone)]
pub struct AssistantEndpoint {
    /// Project endpoint; resource paths are appended to it.
    pub endpoint: Url,
    pub agent_id: String,
    pub thread_id: String,
    /// Bearer token; requests are sent unauthenticated when absent.
    pub api_key: Option<String>,
    pub api_version: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl AssistantEndpoint {
    /// Endpoint with default version, timeout and polling budget.
    pub fn new(endpoint: Url, agent_id: impl Into<String>, thread_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            agent_id: agent_id.into(),
            thread_id: thread_id.into(),
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl std::fmt::Debug for AssistantEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantEndpoint")
            .field("endpoint", &self.endpoint.as_str())
            .field("agent_id", &self.agent_id)
            .field("thread_id", &self.thread_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .finish()
    }
}

/// Result of [`HttpAssistantGateway::probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub agent_id: String,
    pub agent_name: Option<String>,
    pub thread_id: String,
}

/// Assistant gateway speaking HTTP to one agent and thread.
pub struct HttpAssistantGateway {
    client: Client,
    config: AssistantEndpoint,
}

impl HttpAssistantGateway {
    /// Build a gateway whose client enforces `config.timeout` per request.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: AssistantEndpoint) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Confirm that the configured agent and thread exist.
    ///
    /// # Errors
    ///
    /// Returns the same failures as [`AssistantGateway::submit`].
    pub async fn probe(&self) -> Result<ProbeReport, AssistantGatewayError> {
        let agent: AgentDto = self
            .send_json(self.request(Method::GET, &["assistants", &self.config.agent_id])?)
            .await?;
        let thread: ThreadDto = self
            .send_json(self.request(Method::GET, &["threads", &self.config.thread_id])?)
            .await?;
        Ok(ProbeReport {
            agent_id: agent.id,
            agent_name: agent.name,
            thread_id: thread.id,
        })
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> Result<RequestBuilder, AssistantGatewayError> {
        let url = resource_url(&self.config.endpoint, segments)?;
        let builder = self
            .client
            .request(method, url)
            .query(&[("api-version", self.config.api_version.as_str())]);
        Ok(match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, AssistantGatewayError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|err| AssistantGatewayError::decode(err.to_string()))
    }

    async fn wait_for_run(&self, mut run: RunDto) -> Result<(), AssistantGatewayError> {
        let thread = self.config.thread_id.as_str();
        let mut polls = 0;
        loop {
            match run.state() {
                RunState::Finished => return Ok(()),
                RunState::Failed => return Err(AssistantGatewayError::run_failed(run.status)),
                RunState::Pending if polls >= self.config.max_polls => {
                    return Err(AssistantGatewayError::timeout(polls));
                }
                RunState::Pending => {}
            }
            tokio::time::sleep(self.config.poll_interval).await;
            polls += 1;
            run = self
                .send_json(self.request(Method::GET, &["threads", thread, "runs", &run.id])?)
                .await?;
            debug!(run_id = %run.id, status = %run.status, polls, "assistant run polled");
        }
    }
}

#[async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn submit(&self, prompt: &str) -> Result<String, AssistantGatewayError> {
        let thread = self.config.thread_id.as_str();

        let _: serde_json::Value = self
            .send_json(
                self.request(Method::POST, &["threads", thread, "messages"])?
                    .json(&CreateMessageDto {
                        role: "user",
                        content: prompt,
                    }),
            )
            .await?;

        let run: RunDto = self
            .send_json(
                self.request(Method::POST, &["threads", thread, "runs"])?
                    .json(&CreateRunDto {
                        assistant_id: &self.config.agent_id,
                    }),
            )
            .await?;
        debug!(run_id = %run.id, status = %run.status, "assistant run created");
        self.wait_for_run(run).await?;

        let messages: MessageListDto = self
            .send_json(
                self.request(Method::GET, &["threads", thread, "messages"])?
                    .query(&[("order", "desc"), ("limit", "20")]),
            )
            .await?;
        messages
            .latest_assistant_text()
            .ok_or_else(AssistantGatewayError::empty_reply)
    }
}

fn resource_url(base: &Url, segments: &[&str]) -> Result<Url, AssistantGatewayError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AssistantGatewayError::transport("assistant endpoint cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> AssistantGatewayError {
    AssistantGatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AssistantGatewayError {
    AssistantGatewayError::rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 200;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
        preview.push_str("...");
        preview
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://ai.example.com/api/projects/hr", "https://ai.example.com/api/projects/hr/threads/t1/runs")]
    #[case("https://ai.example.com/api/projects/hr/", "https://ai.example.com/api/projects/hr/threads/t1/runs")]
    fn resource_urls_append_segments(#[case] base: &str, #[case] expected: &str) {
        let base = Url::parse(base).expect("url");
        let url = resource_url(&base, &["threads", "t1", "runs"]).expect("resource url");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("queued", RunState::Pending)]
    #[case("in_progress", RunState::Pending)]
    #[case("failed", RunState::Failed)]
    #[case("completed", RunState::Finished)]
    #[case("requires_action", RunState::Finished)]
    fn run_states_follow_status_labels(#[case] status: &str, #[case] expected: RunState) {
        let run = RunDto {
            id: "run_1".to_owned(),
            status: status.to_owned(),
        };
        assert_eq!(run.state(), expected);
    }

    #[rstest]
    fn latest_assistant_text_skips_user_messages() {
        let body = r#"{
            "data": [
                {"role": "user", "content": [{"type": "text", "text": {"value": "Bonjour"}}]},
                {"role": "assistant", "content": [
                    {"type": "image_file", "image_file": {"file_id": "f"}},
                    {"type": "text", "text": {"value": " Vous avez 15 jours. "}}
                ]},
                {"role": "assistant", "content": [{"type": "text", "text": {"value": "old"}}]}
            ]
        }"#;
        let list: MessageListDto = serde_json::from_str(body).expect("decode");
        assert_eq!(list.latest_assistant_text().as_deref(), Some("Vous avez 15 jours."));
    }

    #[rstest]
    fn empty_assistant_messages_yield_nothing() {
        let list: MessageListDto =
            serde_json::from_str(r#"{"data": [{"role": "assistant", "content": []}]}"#)
                .expect("decode");
        assert_eq!(list.latest_assistant_text(), None);
    }

    #[rstest]
    fn status_errors_keep_a_short_preview() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::UNAUTHORIZED, body.as_bytes());
        match error {
            AssistantGatewayError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert!(message.ends_with("..."));
                assert_eq!(message.chars().count(), 203);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn endpoint_debug_redacts_the_key() {
        let mut endpoint = AssistantEndpoint::new(
            Url::parse("https://ai.example.com").expect("url"),
            "asst_1",
            "thread_1",
        );
        endpoint.api_key = Some("sk-secret".to_owned());
        assert!(!format!("{endpoint:?}").contains("sk-secret"));
    }
}
