// src/handlers/clients.rs

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
        auth::{Client, CreateClientPayload, UpdateClientPayload},
        contact::Contact,
    },
};

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListParams),
    responses(
        (status = 200, description = "Usuários (busca: nome, e-mail, CPF)", body = Paginated<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .client_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page =
        ListView::from_params(users, &params, settings.default_page_size, settings.max_page_size).into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Identidade e perfil criados juntos", body = Client),
        (status = 400, description = "Dados inválidos (inclui senha e confirmação diferentes)"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<CreateClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // Validação completa (campos + regras cruzadas) antes de qualquer escrita
    payload
        .check()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .client_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = Client),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .client_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateClientPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<UpdateClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .check()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .client_service
        .update(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário e identidade removidos"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .client_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/users/{id}/contacts
#[utoipa::path(
    post,
    path = "/api/users/{id}/contacts",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = Contact,
    responses(
        (status = 200, description = "Contato adicionado", body = Client),
        (status = 400, description = "Contato inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(contact): ApiJson<Contact>,
) -> Result<impl IntoResponse, ApiError> {
    contact
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .client_service
        .add_contact(id, contact)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}

// DELETE /api/users/{id}/contacts/{index}
#[utoipa::path(
    delete,
    path = "/api/users/{id}/contacts/{index}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário"),
        ("index" = usize, Path, description = "Posição do contato (começa em 0)")
    ),
    responses(
        (status = 200, description = "Contato removido", body = Client),
        (status = 422, description = "Último contato ou posição inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .client_service
        .remove_contact(id, index)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(user)))
}
