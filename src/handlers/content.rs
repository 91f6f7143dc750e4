// src/handlers/content.rs

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
    models::content::{MoveSlidePayload, SaveTextPayload, SiteText, Slide, SlidePayload},
};

// =============================================================================
//  TEXTOS / POLÍTICAS
// =============================================================================

// GET /api/texts
#[utoipa::path(
    get,
    path = "/api/texts",
    tag = "Texts",
    params(ListParams),
    responses(
        (status = 200, description = "Textos do site em ordem de chave", body = Paginated<SiteText>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_texts(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let texts = app_state
        .content_service
        .list_texts()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page =
        ListView::from_params(texts, &params, settings.default_page_size, settings.max_page_size).into_page();

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/texts/{key}
#[utoipa::path(
    get,
    path = "/api/texts/{key}",
    tag = "Texts",
    params(("key" = String, Path, description = "Chave do texto, ex.: privacy_policy")),
    responses(
        (status = 200, description = "Texto", body = SiteText),
        (status = 404, description = "Chave inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_text(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let text = app_state
        .content_service
        .get_text(&key)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(text)))
}

// PUT /api/texts
#[utoipa::path(
    put,
    path = "/api/texts",
    tag = "Texts",
    request_body = SaveTextPayload,
    responses(
        (status = 200, description = "Texto criado ou substituído", body = SiteText),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn save_text(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<SaveTextPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let text = app_state
        .content_service
        .save_text(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(text)))
}

// =============================================================================
//  SLIDES
// =============================================================================

// GET /api/slides
#[utoipa::path(
    get,
    path = "/api/slides",
    tag = "Slides",
    params(ListParams),
    responses(
        (status = 200, description = "Slides em ordem de exibição", body = Paginated<Slide>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_slides(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let slides = app_state
        .content_service
        .list_slides()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page =
        ListView::from_params(slides, &params, settings.default_page_size, settings.max_page_size).into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/slides
#[utoipa::path(
    post,
    path = "/api/slides",
    tag = "Slides",
    request_body = SlidePayload,
    responses(
        (status = 201, description = "Slide criado no fim da fila", body = Slide),
        (status = 400, description = "URL inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_slide(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<SlidePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let slide = app_state
        .content_service
        .create_slide(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(slide)))
}

// PUT /api/slides/{id}
#[utoipa::path(
    put,
    path = "/api/slides/{id}",
    tag = "Slides",
    params(("id" = Uuid, Path, description = "ID do slide")),
    request_body = SlidePayload,
    responses(
        (status = 200, description = "Slide atualizado", body = Slide),
        (status = 404, description = "Slide não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_slide(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<SlidePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let slide = app_state
        .content_service
        .update_slide(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(slide)))
}

// POST /api/slides/{id}/toggle
#[utoipa::path(
    post,
    path = "/api/slides/{id}/toggle",
    tag = "Slides",
    params(("id" = Uuid, Path, description = "ID do slide")),
    responses(
        (status = 200, description = "Slide ativado ou desativado", body = Slide),
        (status = 404, description = "Slide não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_slide(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let slide = app_state
        .content_service
        .toggle_slide(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(slide)))
}

// POST /api/slides/{id}/move
#[utoipa::path(
    post,
    path = "/api/slides/{id}/move",
    tag = "Slides",
    params(("id" = Uuid, Path, description = "ID do slide")),
    request_body = MoveSlidePayload,
    responses(
        (status = 200, description = "Nova ordem dos slides", body = Vec<Slide>),
        (status = 404, description = "Slide não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_slide(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<MoveSlidePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let slides = app_state
        .content_service
        .move_slide(id, payload.direction)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(slides)))
}

// DELETE /api/slides/{id}
#[utoipa::path(
    delete,
    path = "/api/slides/{id}",
    tag = "Slides",
    params(("id" = Uuid, Path, description = "ID do slide")),
    responses(
        (status = 204, description = "Slide removido"),
        (status = 404, description = "Slide não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_slide(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .content_service
        .delete_slide(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
