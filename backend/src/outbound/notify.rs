//! Notification dispatcher adapter.
//!
//! The shop's message transport is an external collaborator; this adapter
//! records every dispatch in the structured log, which is also what the
//! original deployment's stubbed transport did. Swapping in a real email or
//! WhatsApp gateway only means implementing the same port.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotificationDispatcher, NotificationError};
use crate::domain::repair::RepairCode;
use crate::domain::user::{Email, User};

/// Dispatcher that logs every message instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationDispatcher for TracingNotifier {
    async fn send(&self, recipient: &User, message: &str) -> Result<(), NotificationError> {
        info!(to = %recipient.email, message, "notification dispatched");
        Ok(())
    }

    async fn send_ticket(
        &self,
        recipient: &Email,
        repair_code: &RepairCode,
        pdf: &[u8],
    ) -> Result<(), NotificationError> {
        info!(
            to = %recipient,
            repair = %repair_code,
            bytes = pdf.len(),
            "ticket dispatched"
        );
        Ok(())
    }
}
