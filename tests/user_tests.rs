mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use backoffice::db::Table;

use crate::common::spawn_app;

fn operator(email: &str) -> Value {
    json!({
        "name": "Joana Lima",
        "email": email,
        "password": "Senha@123",
        "confirmPassword": "Senha@123",
        "role": "operator",
        "contacts": [
            { "name": "Joana Lima", "email": email, "primary": true }
        ]
    })
}

#[tokio::test]
async fn password_confirmation_must_match() {
    let app = spawn_app().await;
    let identities = app.store.rows(Table::Identities).len();
    let before = app.store.calls();

    let mut payload = operator("joana@agencia.com.br");
    payload["confirmPassword"] = json!("Outra@123");
    let (status, body) = app.post("/api/users", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("confirmPassword").is_some());
    // Só as leituras do auth_guard (identidade e perfil)
    assert_eq!(app.store.calls(), before + 2);
    assert_eq!(app.store.rows(Table::Identities).len(), identities);
}

#[tokio::test]
async fn agent_needs_an_agency() {
    let app = spawn_app().await;

    let mut payload = operator("agente@agencia.com.br");
    payload["role"] = json!("agent");
    let (status, body) = app.post("/api/users", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("agencyId").is_some());
}

#[tokio::test]
async fn user_and_identity_are_created_together() {
    let app = spawn_app().await;

    let (status, user) = app.post("/api/users", operator("Joana@Agencia.com.br")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "joana@agencia.com.br");
    assert_eq!(user["role"], "operator");
    assert!(user.get("password").is_none());
    assert_eq!(app.store.rows(Table::Identities).len(), 2);
    assert_eq!(app.store.rows(Table::Clients).len(), 2);

    let (status, _) = app.post("/api/users", operator("joana@agencia.com.br")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.store.rows(Table::Identities).len(), 2);
}

#[tokio::test]
async fn last_contact_cannot_be_removed() {
    let app = spawn_app().await;

    let (_, user) = app.post("/api/users", operator("joana@agencia.com.br")).await;
    let id = user["id"].as_str().unwrap();

    let (status, body) = app.delete(&format!("/api/users/{id}/contacts/0")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["details"].get("contacts").is_some());
    let (_, user) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(user["contacts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn new_primary_contact_takes_over() {
    let app = spawn_app().await;

    let (_, user) = app.post("/api/users", operator("joana@agencia.com.br")).await;
    let id = user["id"].as_str().unwrap();

    let (status, user) = app
        .post(
            &format!("/api/users/{id}/contacts"),
            json!({ "name": "Carlos", "email": "carlos@agencia.com.br", "primary": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let contacts = user["contacts"].as_array().unwrap();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0]["primary"], false);
    assert_eq!(contacts[1]["primary"], true);

    // Removendo o principal, o primeiro restante assume
    let (status, user) = app.delete(&format!("/api/users/{id}/contacts/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["contacts"][0]["primary"], true);
}

#[tokio::test]
async fn deleting_a_user_removes_the_identity() {
    let app = spawn_app().await;

    let (_, user) = app.post("/api/users", operator("joana@agencia.com.br")).await;
    let id = user["id"].as_str().unwrap();

    let (status, _) = app.delete(&format!("/api/users/{id}")).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.store.rows(Table::Identities).len(), 1);
    let (status, _) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
