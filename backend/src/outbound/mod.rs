//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic:
//!
//! - **persistence**: MongoDB-backed repositories plus in-memory stand-ins
//! - **notify**: structured-log notification dispatcher
//! - **pdf**: printable ticket renderer

pub mod notify;
pub mod pdf;
pub mod persistence;
