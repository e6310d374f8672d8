//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature. The
//! in-memory repositories follow the ordering contracts of the Diesel
//! adapters so services behave the same against either.

mod assistant;
mod clock;
mod employees;
mod chats;

pub use assistant::{FailingAssistantGateway, StaticAssistantGateway};
pub use chats::InMemoryChatRepository;
pub use clock::FixedClock;
pub use employees::{InMemoryEmployeeRepository, PlaintextPasswordHasher};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock `mutex`, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
