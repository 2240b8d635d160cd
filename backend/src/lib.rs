//! Social backend library.
//!
//! The domain layer ([`domain`]) holds records, services, and the operation
//! registry. Inbound adapters ([`inbound`]) expose them over REST, GraphQL,
//! and WebSocket; outbound adapters ([`outbound`]) provide PostgreSQL and
//! in-memory storage plus Argon2 hashing. [`server`] wires it all together.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
