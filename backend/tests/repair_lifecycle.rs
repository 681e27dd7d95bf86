//! End-to-end lifecycle: intake at the front desk, technician starts work,
//! admin finishes, warranty activates.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::Duration;
use serde_json::{Value, json};

use backend::domain::Role;
use support::{epoch, init, seed_user, test_server};

#[actix_web::test]
async fn intake_to_finished_over_http() {
    let server = test_server();
    let customer = seed_user(&server, "cliente@example.com", "Cliente Uno", Role::User).await;
    let desk = seed_user(&server, "desk@example.com", "Front Desk", Role::Reception).await;
    let technician = seed_user(&server, "tech@example.com", "Shop Tech", Role::Technician).await;
    let admin = seed_user(&server, "admin@example.com", "Shop Admin", Role::Admin).await;
    let app = init(&server).await;

    // Intake by reception.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/repairs")
            .set_json(json!({
                "title": "Equipo no enciende",
                "customer": customer.to_string(),
                "receivedBy": desk.to_string(),
                "device": {
                    "type": "Notebook",
                    "brand": "Lenovo",
                    "model": "ThinkPad X1 Carbon (Gen 9)",
                    "physicalCondition": "Golpeado",
                    "flaw": "No enciende"
                }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["repairCode"], "TASK-1001");
    assert_eq!(created["status"], "Ingresado");
    assert_eq!(created["requiresCustomerApproval"], true);
    assert_eq!(created["timeline"].as_array().expect("timeline").len(), 1);
    assert_eq!(created["totalProcessingTimeHours"], 1);

    // Technician starts active work five hours later.
    server.clock.set(epoch() + Duration::hours(5));
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/repairs/TASK-1001")
            .set_json(json!({
                "status": "Reparación en Progreso",
                "note": "Trabajo iniciado",
                "changedBy": technician.to_string()
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let started: Value = actix_test::read_body_json(res).await;
    assert_eq!(started["status"], "Reparación en Progreso");
    assert_eq!(started["timeline"][1]["previousStatus"], "Ingresado");
    assert_eq!(started["timeline"][1]["roleAtChange"], "technician");

    // Admin records completion another 2.5 hours later.
    server.clock.set(epoch() + Duration::hours(5) + Duration::minutes(150));
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/repairs/TASK-1001")
            .set_json(json!({
                "status": "Reparación Finalizada",
                "changedBy": admin.to_string()
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let finished: Value = actix_test::read_body_json(res).await;

    let timeline = finished["timeline"].as_array().expect("timeline");
    assert_eq!(timeline.len(), 3);
    assert_eq!(finished["status"], "Reparación Finalizada");
    assert_eq!(
        finished["status"],
        timeline.last().expect("last entry")["status"]
    );
    assert_eq!(finished["warranty"], true);
    let period = finished["warrantyPeriod"].as_u64().expect("period");
    assert!(period == 30 || period == 60, "unexpected period {period}");
    // 7.5 hours between the first and third entries rounds to 8.
    assert_eq!(finished["totalProcessingTimeHours"], 8);

    // The stored document matches what the transition returned.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/repairs/TASK-1001")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let stored: Value = actix_test::read_body_json(res).await;
    assert_eq!(stored["warranty"], true);
    assert_eq!(stored["warrantyPeriod"].as_u64(), Some(period));
    assert_eq!(stored["version"], 2);
}
