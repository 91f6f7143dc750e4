// src/handlers/orders.rs

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
    models::order::{CreateOrderPayload, Order, StatusFilter, TransitionPayload},
};

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(ListParams, StatusFilter),
    responses(
        (status = 200, description = "OPs, número mais recente primeiro (busca: número, solicitante, forma de pagamento)", body = Paginated<Order>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(params): Query<ListParams>,
    Query(filter): Query<StatusFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .order_service
        .list(filter.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let settings = &app_state.settings;
    let page =
        ListView::from_params(orders, &params, settings.default_page_size, settings.max_page_size).into_page();

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "OP lançada em aberto", body = Order),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    ApiJson(payload): ApiJson<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .create(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da OP")),
    responses(
        (status = 200, description = "OP", body = Order),
        (status = 404, description = "OP não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{id}/status
#[utoipa::path(
    post,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da OP")),
    request_body = TransitionPayload,
    responses(
        (status = 200, description = "Status alterado", body = Order),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    ApiJson(payload): ApiJson<TransitionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .transition(id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{id}/approve-payment
#[utoipa::path(
    post,
    path = "/api/orders/{id}/approve-payment",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da OP")),
    responses(
        (status = 200, description = "Pagamento aprovado; OP em atendimento", body = Order),
        (status = 409, description = "OP não está aguardando pagamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .approve_payment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID da OP")),
    responses(
        (status = 200, description = "OP cancelada", body = Order),
        (status = 409, description = "OP já encerrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .cancel(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}
