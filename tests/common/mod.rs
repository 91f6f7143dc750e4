// tests/common/mod.rs

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use backoffice::{
    config::{AppState, Settings},
    db::MemoryDataClient,
};

pub const ADMIN_EMAIL: &str = "admin@agencia.com.br";
pub const ADMIN_PASSWORD: &str = "Admin@123";
pub const PANEL_ORIGIN: &str = "http://painel.test";

/// App completo sobre o backend em memória, com o admin já logado.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDataClient>,
    pub token: String,
}

fn settings() -> Settings {
    let env: HashMap<&str, &str> = HashMap::from([
        ("STORE_BACKEND", "memory"),
        ("JWT_SECRET", "segredo-de-teste"),
        ("BCRYPT_COST", "4"),
        // Porta fechada: a consulta de CEP falha rápido
        ("POSTAL_LOOKUP_URL", "http://127.0.0.1:9"),
        ("POSTAL_LOOKUP_TIMEOUT_SECS", "1"),
        ("CORS_ALLOWED_ORIGINS", PANEL_ORIGIN),
    ]);
    Settings::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryDataClient::new());
    let state = AppState::from_store(store.clone(), settings()).unwrap();

    state.auth_service.ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    let token = state.auth_service.login(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    TestApp {
        router: backoffice::routes::app(state),
        store,
        token,
    }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, body, Some(&self.token)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let (status, _, json) = self.send_raw(request).await;
        (status, json)
    }

    /// Envia a requisição como veio e devolve também os cabeçalhos.
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, headers, json)
    }
}
