//! Ticket API handlers.
//!
//! ```text
//! GET  /api/v1/tickets/{repairCode}   -> application/pdf
//! POST /api/v1/tickets                -> queue dispatch to an address
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Email, Error, RepairCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Dispatch request body for `POST /api/v1/tickets`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendTicketRequest {
    /// Repair whose ticket should be sent.
    pub repair_code: Option<String>,
    /// Destination address.
    pub email: Option<String>,
}

fn parse_path_code(raw: &str) -> Result<RepairCode, Error> {
    RepairCode::new(raw).map_err(|_| Error::not_found("Repair not found"))
}

/// Download the printable ticket for a repair.
#[utoipa::path(
    get,
    path = "/api/v1/tickets/{repairCode}",
    params(("repairCode" = String, Path, description = "Repair code, e.g. TASK-1001")),
    responses(
        (status = 200, description = "Ticket PDF", content_type = "application/pdf"),
        (status = 404, description = "No such repair", body = Error),
        (status = 500, description = "Rendering failed", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "getTicket"
)]
#[get("/tickets/{repair_code}")]
pub async fn get_ticket(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let code = parse_path_code(&path.into_inner())?;
    let pdf = state.tickets.render_ticket(&code).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "content-disposition",
            format!("inline; filename=\"ticket-{code}.pdf\""),
        ))
        .body(pdf))
}

/// Render a ticket and queue its dispatch to an email address.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body = SendTicketRequest,
    responses(
        (status = 202, description = "Dispatch queued"),
        (status = 400, description = "Missing or invalid fields", body = Error),
        (status = 404, description = "No such repair", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "sendTicket"
)]
#[post("/tickets")]
pub async fn send_ticket(
    state: web::Data<HttpState>,
    payload: web::Json<SendTicketRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let (Some(raw_code), Some(raw_email)) = (request.repair_code, request.email) else {
        return Err(Error::invalid_request("repairCode and email are required"));
    };
    let code = RepairCode::new(raw_code)
        .map_err(|_| Error::invalid_request("repairCode must match TASK-XXXX"))?;
    let email =
        Email::new(raw_email).map_err(|err| Error::invalid_request(err.to_string()))?;

    state.tickets.email_ticket(&code, email).await?;
    Ok(HttpResponse::Accepted().json(json!({ "message": "Ticket enviado correctamente" })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::json;

    use crate::domain::{NewRepair, Priority, Role};
    use crate::domain::repair::Device;
    use crate::inbound::http::test_utils::{TestBackend, seed_user};

    use super::*;

    async fn seeded_repair(backend: &TestBackend) -> RepairCode {
        let customer = seed_user(backend, "cliente@example.com", Role::User).await;
        let desk = seed_user(backend, "desk@example.com", Role::Reception).await;
        let repair = backend
            .state
            .repairs
            .create_repair(NewRepair {
                title: "Cambio de pantalla".to_owned(),
                priority: Priority::Normal,
                customer,
                received_by: desk,
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
            })
            .await
            .expect("intake");
        repair.repair_code
    }

    async fn test_app(
        backend: &TestBackend,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(backend.state.clone()))
                .service(web::scope("/api/v1").service(get_ticket).service(send_ticket)),
        )
        .await
    }

    #[actix_web::test]
    async fn downloads_a_pdf_for_any_repair() {
        let backend = TestBackend::new();
        let code = seeded_repair(&backend).await;
        let app = test_app(&backend).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/tickets/{code}"))
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        assert_eq!(
            res.headers()
                .get("content-type")
                .expect("content type")
                .to_str()
                .expect("ascii header"),
            "application/pdf"
        );
        let body = actix_test::read_body(res).await;
        assert!(body.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn unknown_repair_is_404() {
        let backend = TestBackend::new();
        let app = test_app(&backend).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/tickets/TASK-9999")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn dispatch_is_accepted_for_a_valid_request() {
        let backend = TestBackend::new();
        let code = seeded_repair(&backend).await;
        let app = test_app(&backend).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets")
                .set_json(json!({
                    "repairCode": code.to_string(),
                    "email": "cliente@example.com"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[actix_web::test]
    async fn dispatch_requires_code_and_email() {
        let backend = TestBackend::new();
        let app = test_app(&backend).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/tickets")
                .set_json(json!({ "email": "cliente@example.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
