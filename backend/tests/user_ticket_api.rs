//! User administration and ticket generation over HTTP.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use backend::domain::Role;
use support::{init, seed_user, test_server};

#[actix_web::test]
async fn user_round_trip_never_leaks_credentials() {
    let server = test_server();
    let app = init(&server).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "cliente@example.com",
                "fullname": "Cliente Uno",
                "password": "hashed-secret"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["role"], "user");
    assert!(created.get("password").is_none());
    let id = created["id"].as_str().expect("id").to_owned();

    for uri in [
        "/api/v1/users".to_owned(),
        format!("/api/v1/users/{id}"),
    ] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(&uri).to_request(),
        )
        .await;
        assert!(res.status().is_success(), "{uri}");
        let body = actix_test::read_body(res).await;
        let text = std::str::from_utf8(&body).expect("utf8 body");
        assert!(!text.contains("password"), "credential leak on {uri}");
        assert!(!text.contains("hashed-secret"), "credential leak on {uri}");
    }
}

#[actix_web::test]
async fn by_email_and_owned_repairs() {
    let server = test_server();
    let customer = seed_user(&server, "cliente@example.com", "Cliente Uno", Role::User).await;
    let desk = seed_user(&server, "desk@example.com", "Front Desk", Role::Reception).await;
    let app = init(&server).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/by-email?email=cliente@example.com")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["userId"], customer.to_string());

    // No repairs yet: the owned listing reports 404.
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{customer}/repairs"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/repairs")
            .set_json(json!({
                "title": "Tablet no carga",
                "customer": customer.to_string(),
                "receivedBy": desk.to_string(),
                "device": {
                    "type": "Tablet",
                    "brand": "Lenovo",
                    "model": "Tab M10 Plus",
                    "physicalCondition": "Excelente",
                    "flaw": "No carga"
                }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/users/{customer}/repairs"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let owned: Value = actix_test::read_body_json(res).await;
    assert_eq!(owned.as_array().expect("array").len(), 1);
    assert_eq!(owned[0]["customer"], customer.to_string());
}

#[actix_web::test]
async fn ticket_downloads_as_pdf_and_dispatch_is_accepted() {
    let server = test_server();
    let customer = seed_user(&server, "cliente@example.com", "Cliente Uno", Role::User).await;
    let desk = seed_user(&server, "desk@example.com", "Front Desk", Role::Reception).await;
    let app = init(&server).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/repairs")
            .set_json(json!({
                "title": "Consola congelada",
                "customer": customer.to_string(),
                "receivedBy": desk.to_string(),
                "device": {
                    "type": "Consola de video juego",
                    "brand": "Sony",
                    "model": "PlayStation 5",
                    "physicalCondition": "Excelente",
                    "flaw": "Se congela en el inicio"
                }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    let code = created["repairCode"].as_str().expect("code").to_owned();

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/tickets/{code}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("content-type")
            .expect("content type")
            .to_str()
            .expect("ascii header"),
        "application/pdf"
    );
    let pdf = actix_test::read_body(res).await;
    assert!(pdf.starts_with(b"%PDF"));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/tickets")
            .set_json(json!({ "repairCode": code, "email": "cliente@example.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::ACCEPTED);
}

#[actix_web::test]
async fn health_probes_respond() {
    let server = test_server();
    let app = init(&server).await;

    for uri in ["/health/live", "/health/ready"] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert!(res.status().is_success(), "{uri}");
    }
}
