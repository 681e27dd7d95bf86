//! Actix middleware kept at the edge of the hexagon.

pub mod trace;

pub use trace::Trace;
