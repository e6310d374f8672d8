//! Driven port for password hashing.

use super::define_port_error;

define_port_error! {
    /// Hashing backend failures.
    pub enum PasswordHashError {
        /// Hash generation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not a valid PHC string.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Produces and checks password hashes.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
