//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed employee and chat repositories using
//!   Diesel ORM
//! - **assistant**: reqwest client for the hosted conversational assistant
//! - **security**: Argon2 password hashing
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod assistant;
pub mod persistence;
pub mod security;
