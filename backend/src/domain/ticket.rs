//! Printable ticket layout for a repair.
//!
//! Building the document is a pure function of a repair plus the populated
//! customer snapshot; any repair in any state renders. The outbound PDF
//! adapter turns the document into bytes; nothing here touches the entity.

use serde::Serialize;

use super::ports::RenderError;
use super::repair::Repair;
use super::user::User;

/// Customer fields that appear on the printed ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    /// Customer display name.
    pub fullname: String,
    /// Customer contact address.
    pub email: String,
}

impl From<&User> for CustomerSnapshot {
    fn from(user: &User) -> Self {
        Self {
            fullname: user.fullname.to_string(),
            email: user.email.to_string(),
        }
    }
}

/// One label/value line on the ticket body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketLine {
    /// Printed label.
    pub label: &'static str,
    /// Printed value.
    pub value: String,
}

/// Fixed-layout printable summary of a repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDocument {
    /// Document heading.
    pub heading: String,
    /// Body lines in print order.
    pub lines: Vec<TicketLine>,
    /// Closing line.
    pub footer: String,
}

impl TicketDocument {
    /// Build the document from a repair and its customer snapshot.
    ///
    /// Fails with [`RenderError::MissingField`] when the snapshot lacks the
    /// customer name or email the printed ticket requires.
    pub fn from_repair(
        repair: &Repair,
        customer: &CustomerSnapshot,
    ) -> Result<Self, RenderError> {
        if customer.fullname.trim().is_empty() {
            return Err(RenderError::MissingField {
                field: "customer fullname",
            });
        }
        if customer.email.trim().is_empty() {
            return Err(RenderError::MissingField {
                field: "customer email",
            });
        }

        let line = |label: &'static str, value: String| TicketLine { label, value };
        let device = &repair.device;
        let lines = vec![
            line("Código de reparación", repair.repair_code.to_string()),
            line("Título", repair.title.clone()),
            line("Estado", repair.status.to_string()),
            line("Prioridad", repair.priority.to_string()),
            line("Dispositivo", device.kind.clone()),
            line("Marca", device.brand.clone()),
            line("Modelo", device.model.clone()),
            line("Desperfecto", device.flaw.clone()),
            line(
                "Observaciones",
                device.notes.clone().unwrap_or_else(|| "N/A".to_owned()),
            ),
            line("Cliente", customer.fullname.clone()),
            line("Correo", customer.email.clone()),
            line(
                "Fecha de creación",
                repair.created_at.format("%d/%m/%Y").to_string(),
            ),
        ];

        Ok(Self {
            heading: format!("Ticket de reparación - {}", repair.repair_code),
            lines,
            footer: "Conserve este ticket para retirar su equipo.".to_owned(),
        })
    }
}
