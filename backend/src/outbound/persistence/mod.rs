//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the employee and chat repositories backed by
//! PostgreSQL via Diesel, with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Async-safe pooling**: connections come from a `bb8` pool.
//! - **Strongly typed errors**: Diesel and pool failures map to the port
//!   error enums.
//!
//! # Example
//!
//! ```ignore
//! use hr_assistant::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/hr")).await?;
//! let employees = DieselEmployeeRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_chat_repository;
mod diesel_employee_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_chat_repository::DieselChatRepository;
pub use diesel_employee_repository::DieselEmployeeRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
