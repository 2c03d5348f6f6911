//! Skymarket classifieds backend.
//!
//! Hexagonal layout: [`domain`] holds entities, policies and ports;
//! [`inbound`] adapts HTTP onto domain services; [`outbound`] implements the
//! repository ports over PostgreSQL or process memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
