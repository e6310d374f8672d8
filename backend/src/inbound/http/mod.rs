//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod chats;
pub mod employees;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
