//! Repair-shop management backend.
//!
//! Hexagonal layout: the [`domain`] owns the repair timeline engine and its
//! invariants, [`inbound`] adapts HTTP onto it, and [`outbound`] implements
//! the persistence, notification, and rendering ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

#[cfg(feature = "example-data")]
pub mod seed;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-tracing middleware re-exported for server wiring.
pub use middleware::Trace;
