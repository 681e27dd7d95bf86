//! Ticket generation: fetch a repair snapshot, lay out the printable
//! document, and render it through the PDF port.
//!
//! Rendering has no side effects on the repair. Emailing a ticket reuses the
//! notification port and is dispatched on a detached task, matching the
//! best-effort contract of every other outbound message.

use std::sync::Arc;

use tracing::{info, warn};

use super::error::Error;
use super::ports::{NotificationDispatcher, RenderError, RepairRepository, TicketRenderer,
    UserRepository};
use super::repair::{Repair, RepairCode};
use super::repair_service::{map_repair_store_error, map_user_store_error};
use super::ticket::{CustomerSnapshot, TicketDocument};
use super::user::Email;

/// Renders and dispatches printable repair tickets.
pub struct TicketService {
    repairs: Arc<dyn RepairRepository>,
    users: Arc<dyn UserRepository>,
    renderer: Arc<dyn TicketRenderer>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl TicketService {
    /// Wire the service to its collaborators.
    #[must_use]
    pub fn new(
        repairs: Arc<dyn RepairRepository>,
        users: Arc<dyn UserRepository>,
        renderer: Arc<dyn TicketRenderer>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            repairs,
            users,
            renderer,
            notifier,
        }
    }

    /// Render the printable ticket for a repair.
    pub async fn render_ticket(&self, code: &RepairCode) -> Result<Vec<u8>, Error> {
        let (repair, customer) = self.snapshot(code).await?;
        let document =
            TicketDocument::from_repair(&repair, &customer).map_err(map_render_error)?;
        self.renderer.render(&document).map_err(map_render_error)
    }

    /// Render the ticket and queue its dispatch to `recipient`.
    ///
    /// Returns as soon as the document renders; delivery itself is
    /// best-effort on a detached task.
    pub async fn email_ticket(&self, code: &RepairCode, recipient: Email) -> Result<(), Error> {
        let pdf = self.render_ticket(code).await?;

        let notifier = Arc::clone(&self.notifier);
        let code = code.clone();
        tokio::spawn(async move {
            match notifier.send_ticket(&recipient, &code, &pdf).await {
                Ok(()) => info!(repair = %code, to = %recipient, "ticket dispatched"),
                Err(error) => {
                    warn!(%error, repair = %code, to = %recipient, "ticket dispatch failed");
                }
            }
        });
        Ok(())
    }

    async fn snapshot(&self, code: &RepairCode) -> Result<(Repair, CustomerSnapshot), Error> {
        let repair = self
            .repairs
            .find_by_code(code)
            .await
            .map_err(map_repair_store_error)?
            .ok_or_else(|| Error::not_found("Repair not found"))?;
        let customer = self
            .users
            .find_by_id(&repair.customer)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::not_found("Customer not found"))?;
        Ok((repair, CustomerSnapshot::from(&customer)))
    }
}

fn map_render_error(err: RenderError) -> Error {
    Error::internal(err.to_string())
}
