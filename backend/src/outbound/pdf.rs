//! PDF ticket renderer.
//!
//! Draws the domain's [`TicketDocument`] onto a fixed 600x800 pt page in
//! Helvetica, one label/value pair per line, mirroring the paper tickets the
//! shop has always printed.

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};

use crate::domain::ports::{RenderError, TicketRenderer};
use crate::domain::ticket::TicketDocument;

/// Ticket renderer backed by `printpdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintpdfTicketRenderer;

impl TicketRenderer for PrintpdfTicketRenderer {
    fn render(&self, document: &TicketDocument) -> Result<Vec<u8>, RenderError> {
        let (pdf, page, layer) = PdfDocument::new(
            document.heading.clone(),
            Mm::from(Pt(600.0)),
            Mm::from(Pt(800.0)),
            "Ticket",
        );
        let layer = pdf.get_page(page).get_layer(layer);
        let font = pdf
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| RenderError::backend(err.to_string()))?;
        let bold = pdf
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| RenderError::backend(err.to_string()))?;

        let x = Mm::from(Pt(50.0));
        // Body starts at 750 pt and steps 15 pt per line, as on the original
        // paper layout.
        let mut y = 750.0;

        layer.use_text(document.heading.clone(), 16.0, x, Mm::from(Pt(y)), &bold);
        y -= 30.0;

        for line in &document.lines {
            layer.use_text(
                format!("{}: {}", line.label, line.value),
                12.0,
                x,
                Mm::from(Pt(y)),
                &font,
            );
            y -= 15.0;
        }

        layer.use_text(document.footer.clone(), 12.0, x, Mm::from(Pt(60.0)), &font);

        pdf.save_to_bytes()
            .map_err(|err| RenderError::backend(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use crate::domain::repair::{Device, IntakeDetails, Repair, RepairCode};
    use crate::domain::role::Role;
    use crate::domain::status::Priority;
    use crate::domain::ticket::CustomerSnapshot;
    use crate::domain::user::UserId;

    use super::*;

    fn document() -> TicketDocument {
        let repair = Repair::intake(
            RepairCode::allocate(0),
            IntakeDetails {
                title: "Cambio de pantalla".to_owned(),
                priority: Priority::Normal,
                customer: UserId::random(),
                received_by: UserId::random(),
                received_by_role: Role::Reception,
                device: Device {
                    kind: "Celular".to_owned(),
                    brand: "Samsung".to_owned(),
                    model: "Galaxy S21".to_owned(),
                    serial_number: None,
                    physical_condition: "Rayado".to_owned(),
                    flaw: "Pantalla dañada".to_owned(),
                    password_or_pattern: None,
                    notes: None,
                },
                estimated_completion: None,
            },
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        let customer = CustomerSnapshot {
            fullname: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
        };
        TicketDocument::from_repair(&repair, &customer).expect("layout")
    }

    #[test]
    fn produces_a_pdf_byte_stream() {
        let bytes = PrintpdfTicketRenderer
            .render(&document())
            .expect("render succeeds");
        assert!(bytes.starts_with(b"%PDF"), "missing PDF header");
        assert!(bytes.len() > 500, "suspiciously small document");
    }
}
