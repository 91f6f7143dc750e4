// src/handlers/gateways.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        error::{ApiError, AppError},
        json::ApiJson,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::gateway::{GatewayDetail, GatewayProvider, GatewaySummary, SaveGatewayPayload},
};

// Provedor fora da lista conhecida é tratado como recurso inexistente
fn provider_from_path(raw: &str) -> Result<GatewayProvider, AppError> {
    raw.parse().map_err(|_| AppError::NotFound("gateway"))
}

// GET /api/gateways
#[utoipa::path(
    get,
    path = "/api/gateways",
    tag = "Gateways",
    responses(
        (status = 200, description = "Provedores com status e campos configurados", body = Vec<GatewaySummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_gateways(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let gateways = app_state
        .gateway_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(gateways)))
}

// GET /api/gateways/{provider}
#[utoipa::path(
    get,
    path = "/api/gateways/{provider}",
    tag = "Gateways",
    params(("provider" = GatewayProvider, Path, description = "pagarme, mercadopago, stripe ou asaas")),
    responses(
        (status = 200, description = "Credenciais (segredos mascarados)", body = GatewayDetail),
        (status = 404, description = "Provedor desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_gateway(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(provider): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = provider_from_path(&provider).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .gateway_service
        .get(provider)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PUT /api/gateways/{provider}
#[utoipa::path(
    put,
    path = "/api/gateways/{provider}",
    tag = "Gateways",
    params(("provider" = GatewayProvider, Path, description = "pagarme, mercadopago, stripe ou asaas")),
    request_body = SaveGatewayPayload,
    responses(
        (status = 200, description = "Credenciais salvas", body = GatewayDetail),
        (status = 404, description = "Provedor desconhecido"),
        (status = 422, description = "Campo desconhecido ou ativação incompleta")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_gateway(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(provider): Path<String>,
    ApiJson(payload): ApiJson<SaveGatewayPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = provider_from_path(&provider).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .gateway_service
        .save(provider, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}
