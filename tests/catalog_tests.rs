mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use backoffice::db::Table;

use crate::common::{spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD, PANEL_ORIGIN};

fn raw_post(uri: &str, token: &str, content_type: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_LANGUAGE, "en-US")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = spawn_app().await;

    let (status, body) = app.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn admin_routes_need_a_token() {
    let app = spawn_app().await;

    let (status, _) = app.send(Method::GET, "/api/banks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(Method::GET, "/api/banks", None, Some("lixo")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_returns_a_working_token() {
    let app = spawn_app().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.send(Method::GET, "/api/auth/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["identity"]["email"], ADMIN_EMAIL);
    assert_eq!(me["profile"]["role"], "admin");
    assert!(me["identity"].get("passwordHash").is_none());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = spawn_app().await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "Errada@123" })),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_bank_shows_up_in_the_list() {
    let app = spawn_app().await;

    let (status, bank) = app
        .post("/api/banks", json!({ "code": "001", "name": "Banco Exemplo" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bank["code"], "001");

    let (status, page) = app.get("/api/banks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["name"], "Banco Exemplo");

    let (_, page) = app.get("/api/banks?search=exemplo").await;
    assert_eq!(page["total"], 1);
    let (_, page) = app.get("/api/banks?search=itau").await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn duplicated_bank_code_is_a_field_error() {
    let app = spawn_app().await;

    app.post("/api/banks", json!({ "code": "001", "name": "Banco Exemplo" })).await;
    let (status, body) = app
        .post("/api/banks", json!({ "code": "001", "name": "Outro Banco" }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["details"].get("code").is_some());
    assert_eq!(app.store.rows(Table::Banks).len(), 1);
}

#[tokio::test]
async fn blank_required_field_never_reaches_the_store() {
    let app = spawn_app().await;
    let before = app.store.calls();

    let (status, body) = app.post("/api/banks", json!({ "code": "001", "name": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("name").is_some());
    // Só as leituras do auth_guard (identidade e perfil)
    assert_eq!(app.store.calls(), before + 2);
    assert!(app.store.rows(Table::Banks).is_empty());
}

#[tokio::test]
async fn bank_code_cannot_change_on_update() {
    let app = spawn_app().await;

    let (_, bank) = app.post("/api/banks", json!({ "code": "237", "name": "Banco A" })).await;
    let id = bank["id"].as_str().unwrap();

    let (status, updated) = app
        .put(&format!("/api/banks/{id}"), json!({ "code": "999", "name": "Banco B" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["code"], "237");
    assert_eq!(updated["name"], "Banco B");
}

#[tokio::test]
async fn deleting_a_missing_bank_is_not_found() {
    let app = spawn_app().await;

    let (status, _) = app.delete(&format!("/api/banks/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_form_reports_every_field() {
    let app = spawn_app().await;

    let (status, body) = app.post("/api/banks", json!({ "code": "", "name": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(body["details"].get("code").is_some());
    assert!(body["details"].get("name").is_some());
}

#[tokio::test]
async fn broken_json_gets_the_api_error_shape() {
    let app = spawn_app().await;

    let (status, _, body) = app
        .send_raw(raw_post("/api/banks", &app.token, "application/json", "{\"code\": \"001\""))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The request body is not valid JSON for this operation.");
    assert!(body["details"]["body"][0].is_string());

    // Tipo errado num campo: JSON válido, dados inválidos
    let (status, _, body) = app
        .send_raw(raw_post("/api/banks", &app.token, "application/json", r#"{"code": ["001"], "name": "X"}"#))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"]["body"].is_array());

    let (status, _, body) = app
        .send_raw(raw_post("/api/banks", &app.token, "text/plain", r#"{"code": "001", "name": "X"}"#))
        .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "Send the body as application/json.");

    assert!(app.store.rows(Table::Banks).is_empty());
}

#[tokio::test]
async fn cors_only_answers_configured_origins() {
    let app = spawn_app().await;
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/banks")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let (_, headers, _) = app.send_raw(preflight(PANEL_ORIGIN)).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], PANEL_ORIGIN);

    let (_, headers, _) = app.send_raw(preflight("https://outro-site.com")).await;
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
