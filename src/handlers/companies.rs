// src/handlers/companies.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        json::ApiJson,
        listing::{ListParams, ListView, Paginated},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::company::{AddTierPayload, Company, CompanyPayload},
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    params(ListParams),
    responses(
        (status = 200, description = "Companhias aéreas (busca: nome)", body = Paginated<Company>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .company_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page = ListView::from_params(companies, &params, settings.default_page_size, settings.max_page_size)
        .into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CompanyPayload,
    responses(
        (status = 201, description = "Companhia cadastrada", body = Company),
        (status = 400, description = "Dados inválidos (inclui faixas de milhas)")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<CompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .company_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(company)))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da companhia")),
    responses(
        (status = 200, description = "Companhia", body = Company),
        (status = 404, description = "Companhia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .company_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(company)))
}

// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da companhia")),
    request_body = CompanyPayload,
    responses(
        (status = 200, description = "Companhia atualizada", body = Company),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Companhia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<CompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let company = app_state
        .company_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(company)))
}

// DELETE /api/companies/{id}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da companhia")),
    responses(
        (status = 204, description = "Companhia removida"),
        (status = 404, description = "Companhia não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .company_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/companies/{id}/tiers
#[utoipa::path(
    post,
    path = "/api/companies/{id}/tiers",
    tag = "Companies",
    params(("id" = Uuid, Path, description = "ID da companhia")),
    request_body = AddTierPayload,
    responses(
        (status = 200, description = "Faixa adicionada; a anterior fecha em min - 1", body = Company),
        (status = 422, description = "Início menor ou igual ao da última faixa")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AddTierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .company_service
        .add_tier(id, payload.min, payload.price)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(company)))
}

// DELETE /api/companies/{id}/tiers/{index}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}/tiers/{index}",
    tag = "Companies",
    params(
        ("id" = Uuid, Path, description = "ID da companhia"),
        ("index" = usize, Path, description = "Posição da faixa (começa em 0)")
    ),
    responses(
        (status = 200, description = "Faixa removida; a vizinha absorve o intervalo", body = Company),
        (status = 422, description = "Única faixa ou posição inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, ApiError> {
    let company = app_state
        .company_service
        .remove_tier(id, index)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(company)))
}
