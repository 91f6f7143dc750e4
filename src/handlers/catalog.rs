// src/handlers/catalog.rs
// Tabelas de apoio: atividades e bancos.

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
    models::{
        activity::{Activity, ActivityPayload},
        bank::{Bank, CreateBankPayload, UpdateBankPayload},
    },
};

// =============================================================================
//  ATIVIDADES
// =============================================================================

// GET /api/activities
#[utoipa::path(
    get,
    path = "/api/activities",
    tag = "Activities",
    params(ListParams),
    responses(
        (status = 200, description = "Atividades (busca: nome, descrição)", body = Paginated<Activity>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_activities(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let activities = app_state
        .activity_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page = ListView::from_params(activities, &params, settings.default_page_size, settings.max_page_size)
        .into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/activities
#[utoipa::path(
    post,
    path = "/api/activities",
    tag = "Activities",
    request_body = ActivityPayload,
    responses(
        (status = 201, description = "Atividade criada", body = Activity),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<ActivityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let activity = app_state
        .activity_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(activity)))
}

// PUT /api/activities/{id}
#[utoipa::path(
    put,
    path = "/api/activities/{id}",
    tag = "Activities",
    params(("id" = Uuid, Path, description = "ID da atividade")),
    request_body = ActivityPayload,
    responses(
        (status = 200, description = "Atividade atualizada", body = Activity),
        (status = 404, description = "Atividade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<ActivityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let activity = app_state
        .activity_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(activity)))
}

// DELETE /api/activities/{id}
#[utoipa::path(
    delete,
    path = "/api/activities/{id}",
    tag = "Activities",
    params(("id" = Uuid, Path, description = "ID da atividade")),
    responses(
        (status = 204, description = "Atividade removida"),
        (status = 404, description = "Atividade não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .activity_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  BANCOS
// =============================================================================

// GET /api/banks
#[utoipa::path(
    get,
    path = "/api/banks",
    tag = "Banks",
    params(ListParams),
    responses(
        (status = 200, description = "Bancos em ordem de código (busca: código, nome)", body = Paginated<Bank>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_banks(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let banks = app_state
        .bank_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page =
        ListView::from_params(banks, &params, settings.default_page_size, settings.max_page_size).into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/banks
#[utoipa::path(
    post,
    path = "/api/banks",
    tag = "Banks",
    request_body = CreateBankPayload,
    responses(
        (status = 201, description = "Banco cadastrado", body = Bank),
        (status = 400, description = "Código fora do formato de 3 dígitos"),
        (status = 409, description = "Código já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<CreateBankPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let bank = app_state
        .bank_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(bank)))
}

// GET /api/banks/{id}
#[utoipa::path(
    get,
    path = "/api/banks/{id}",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco")),
    responses(
        (status = 200, description = "Banco", body = Bank),
        (status = 404, description = "Banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bank = app_state
        .bank_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bank)))
}

// PUT /api/banks/{id}
#[utoipa::path(
    put,
    path = "/api/banks/{id}",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco")),
    request_body = UpdateBankPayload,
    responses(
        (status = 200, description = "Nome atualizado (o código não muda)", body = Bank),
        (status = 404, description = "Banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateBankPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let bank = app_state
        .bank_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(bank)))
}

// DELETE /api/banks/{id}
#[utoipa::path(
    delete,
    path = "/api/banks/{id}",
    tag = "Banks",
    params(("id" = Uuid, Path, description = "ID do banco")),
    responses(
        (status = 204, description = "Banco removido"),
        (status = 404, description = "Banco não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_bank(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .bank_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
