//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`, so they only
//! depend on the domain services and remain testable without real
//! infrastructure behind the ports.

use std::sync::Arc;

use crate::domain::{RepairService, TicketService, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Timeline engine and repair access operations.
    pub repairs: Arc<RepairService>,
    /// User store operations.
    pub users: Arc<UserDirectory>,
    /// Ticket rendering and dispatch.
    pub tickets: Arc<TicketService>,
}

impl HttpState {
    /// Bundle the domain services for the HTTP layer.
    #[must_use]
    pub fn new(
        repairs: Arc<RepairService>,
        users: Arc<UserDirectory>,
        tickets: Arc<TicketService>,
    ) -> Self {
        Self {
            repairs,
            users,
            tickets,
        }
    }
}
