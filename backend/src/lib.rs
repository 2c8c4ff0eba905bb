//! User registry library modules.
//!
//! A REST service for user records: the [`domain`] owns validation and the
//! five user operations, [`inbound`] adapts them to HTTP, and [`outbound`]
//! provides the document store and in-memory repositories.

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
pub use domain::TraceId;
pub use middleware::Trace;
