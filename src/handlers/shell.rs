// src/handlers/shell.rs
// Apoio às telas: menu lateral, navegação tipada e consulta de CEP.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::ApiError, json::ApiJson},
    config::AppState,
    middleware::i18n::Locale,
    models::navigation::{self, MenuEntry, NavigatePayload, Page, ResolvedPage},
    services::postal_service::PostalAddress,
};

// GET /api/navigation/menu
#[utoipa::path(
    get,
    path = "/api/navigation/menu",
    tag = "Navigation",
    responses(
        (status = 200, description = "Itens da barra lateral, na ordem do menu", body = Vec<MenuEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn menu() -> impl IntoResponse {
    (StatusCode::OK, Json(navigation::menu()))
}

// POST /api/navigation/resolve
#[utoipa::path(
    post,
    path = "/api/navigation/resolve",
    tag = "Navigation",
    request_body = NavigatePayload,
    responses(
        (status = 200, description = "Tela e rota correspondente", body = ResolvedPage),
        (status = 422, description = "Resultado de voos sem identificador da busca")
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<NavigatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let page = Page::resolve(payload.page, payload.search_id.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let route = page.route();
    Ok((StatusCode::OK, Json(ResolvedPage { page, route })))
}

// GET /api/postal-codes/{cep}
#[utoipa::path(
    get,
    path = "/api/postal-codes/{cep}",
    tag = "Postal",
    params(("cep" = String, Path, description = "CEP com ou sem máscara")),
    responses(
        (status = 200, description = "Endereço encontrado, ou null quando a consulta falha", body = Option<PostalAddress>)
    ),
    security(("api_jwt" = []))
)]
pub async fn lookup_postal_code(
    State(app_state): State<AppState>,
    Path(cep): Path<String>,
) -> impl IntoResponse {
    // Melhor esforço: a tela segue com os campos em branco
    let address = app_state.postal_service.lookup(&cep).await;
    (StatusCode::OK, Json(address))
}
