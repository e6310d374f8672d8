//! HR assistant backend library.
//!
//! Hexagonal layout: [`domain`] holds the model, policies, services and
//! ports; [`inbound`] adapts HTTP requests onto driving ports; [`outbound`]
//! implements the driven ports against PostgreSQL, the hosted assistant and
//! argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
