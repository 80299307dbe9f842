//! LearnHub backend library: course catalog, enrollment and auth state.
//!
//! The domain core lives in [`domain`]; HTTP and WebSocket adapters sit in
//! [`inbound`], while storage adapters sit in [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
