//! Hosted assistant outbound adapter.
//!
//! A thin reqwest implementation of the `AssistantGateway` port for an
//! agent/thread style API.

mod dto;
mod http_gateway;

pub use http_gateway::{
    AssistantEndpoint, DEFAULT_API_VERSION, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL,
    DEFAULT_TIMEOUT, HttpAssistantGateway, ProbeReport,
};
