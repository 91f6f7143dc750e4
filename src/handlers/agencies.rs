// src/handlers/agencies.rs

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
    models::agency::{Agency, AgencyPayload, AgencyProfile, AgencyProfilePayload, PrimaryContactPayload},
};

// =============================================================================
//  AGÊNCIAS
// =============================================================================

// GET /api/agencies
#[utoipa::path(
    get,
    path = "/api/agencies",
    tag = "Agencies",
    params(ListParams),
    responses(
        (status = 200, description = "Agências (busca: razão social, nome fantasia, CNPJ)", body = Paginated<Agency>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_agencies(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let agencies = app_state
        .agency_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page = ListView::from_params(agencies, &params, settings.default_page_size, settings.max_page_size)
        .into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/agencies
#[utoipa::path(
    post,
    path = "/api/agencies",
    tag = "Agencies",
    request_body = AgencyPayload,
    responses(
        (status = 201, description = "Agência cadastrada", body = Agency),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ já cadastrado"),
        (status = 422, description = "Perfil ou atividade inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<AgencyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let agency = app_state
        .agency_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(agency)))
}

// GET /api/agencies/{id}
#[utoipa::path(
    get,
    path = "/api/agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 200, description = "Agência", body = Agency),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let agency = app_state
        .agency_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(agency)))
}

// PUT /api/agencies/{id}
#[utoipa::path(
    put,
    path = "/api/agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    request_body = AgencyPayload,
    responses(
        (status = 200, description = "Agência atualizada", body = Agency),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AgencyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let agency = app_state
        .agency_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(agency)))
}

// DELETE /api/agencies/{id}
#[utoipa::path(
    delete,
    path = "/api/agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 204, description = "Agência removida"),
        (status = 404, description = "Agência não encontrada"),
        (status = 409, description = "Agência em uso por usuários ou OPs")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .agency_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/agencies/{id}/primary-contact
#[utoipa::path(
    put,
    path = "/api/agencies/{id}/primary-contact",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    request_body = PrimaryContactPayload,
    responses(
        (status = 200, description = "Contato principal trocado", body = Agency),
        (status = 422, description = "Posição inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_primary_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<PrimaryContactPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let agency = app_state
        .agency_service
        .set_primary_contact(id, payload.index)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(agency)))
}

// =============================================================================
//  PERFIS DE AGÊNCIA
// =============================================================================

// GET /api/agency-profiles
#[utoipa::path(
    get,
    path = "/api/agency-profiles",
    tag = "Agency Profiles",
    params(ListParams),
    responses(
        (status = 200, description = "Perfis (ativos e inativos)", body = Paginated<AgencyProfile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_profiles(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let profiles = app_state
        .agency_service
        .list_profiles()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page = ListView::from_params(profiles, &params, settings.default_page_size, settings.max_page_size)
        .into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/agency-profiles
#[utoipa::path(
    post,
    path = "/api/agency-profiles",
    tag = "Agency Profiles",
    request_body = AgencyProfilePayload,
    responses(
        (status = 201, description = "Perfil criado (ativo)", body = AgencyProfile),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<AgencyProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let profile = app_state
        .agency_service
        .create_profile(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(profile)))
}

// PUT /api/agency-profiles/{id}
#[utoipa::path(
    put,
    path = "/api/agency-profiles/{id}",
    tag = "Agency Profiles",
    params(("id" = Uuid, Path, description = "ID do perfil")),
    request_body = AgencyProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = AgencyProfile),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Perfil não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<AgencyProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let profile = app_state
        .agency_service
        .update_profile(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/agency-profiles/{id}/toggle
#[utoipa::path(
    post,
    path = "/api/agency-profiles/{id}/toggle",
    tag = "Agency Profiles",
    params(("id" = Uuid, Path, description = "ID do perfil")),
    responses(
        (status = 200, description = "Perfil ativado ou desativado", body = AgencyProfile),
        (status = 404, description = "Perfil não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .agency_service
        .toggle_profile(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}
