// src/routes.rs

use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo da API.
pub fn app(app_state: AppState) -> Router {
    let allowed_origins = app_state.settings.cors_allowed_origins.clone();
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new() // nenhuma origem liberada = só mesma origem
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
    };

    let agency_routes = Router::new()
        .route(
            "/agencies",
            get(handlers::agencies::list_agencies).post(handlers::agencies::create_agency),
        )
        .route(
            "/agencies/{id}",
            get(handlers::agencies::get_agency)
                .put(handlers::agencies::update_agency)
                .delete(handlers::agencies::delete_agency),
        )
        .route("/agencies/{id}/primary-contact", put(handlers::agencies::set_primary_contact))
        .route(
            "/agency-profiles",
            get(handlers::agencies::list_profiles).post(handlers::agencies::create_profile),
        )
        .route("/agency-profiles/{id}", put(handlers::agencies::update_profile))
        .route("/agency-profiles/{id}/toggle", post(handlers::agencies::toggle_profile));

    let user_routes = Router::new()
        .route(
            "/users",
            get(handlers::clients::list_users).post(handlers::clients::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::clients::get_user)
                .put(handlers::clients::update_user)
                .delete(handlers::clients::delete_user),
        )
        .route("/users/{id}/contacts", post(handlers::clients::add_contact))
        .route("/users/{id}/contacts/{index}", delete(handlers::clients::remove_contact));

    let catalog_routes = Router::new()
        .route(
            "/activities",
            get(handlers::catalog::list_activities).post(handlers::catalog::create_activity),
        )
        .route(
            "/activities/{id}",
            put(handlers::catalog::update_activity).delete(handlers::catalog::delete_activity),
        )
        .route(
            "/banks",
            get(handlers::catalog::list_banks).post(handlers::catalog::create_bank),
        )
        .route(
            "/banks/{id}",
            get(handlers::catalog::get_bank)
                .put(handlers::catalog::update_bank)
                .delete(handlers::catalog::delete_bank),
        )
        .route(
            "/companies",
            get(handlers::companies::list_companies).post(handlers::companies::create_company),
        )
        .route(
            "/companies/{id}",
            get(handlers::companies::get_company)
                .put(handlers::companies::update_company)
                .delete(handlers::companies::delete_company),
        )
        .route("/companies/{id}/tiers", post(handlers::companies::add_tier))
        .route("/companies/{id}/tiers/{index}", delete(handlers::companies::remove_tier));

    let settings_routes = Router::new()
        .route("/gateways", get(handlers::gateways::list_gateways))
        .route(
            "/gateways/{provider}",
            get(handlers::gateways::get_gateway).put(handlers::gateways::save_gateway),
        )
        .route(
            "/texts",
            get(handlers::content::list_texts).put(handlers::content::save_text),
        )
        .route("/texts/{key}", get(handlers::content::get_text))
        .route(
            "/slides",
            get(handlers::content::list_slides).post(handlers::content::create_slide),
        )
        .route(
            "/slides/{id}",
            put(handlers::content::update_slide).delete(handlers::content::delete_slide),
        )
        .route("/slides/{id}/toggle", post(handlers::content::toggle_slide))
        .route("/slides/{id}/move", post(handlers::content::move_slide));

    let order_routes = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/orders/{id}", get(handlers::orders::get_order))
        .route("/orders/{id}/status", post(handlers::orders::transition_order))
        .route("/orders/{id}/approve-payment", post(handlers::orders::approve_payment))
        .route("/orders/{id}/cancel", post(handlers::orders::cancel_order));

    let shell_routes = Router::new()
        .route("/navigation/menu", get(handlers::shell::menu))
        .route("/navigation/resolve", post(handlers::shell::resolve))
        .route("/postal-codes/{cep}", get(handlers::shell::lookup_postal_code));

    // Tudo o que é administração passa pelo auth_guard
    let admin_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .merge(agency_routes)
        .merge(user_routes)
        .merge(catalog_routes)
        .merge(settings_routes)
        .merge(order_routes)
        .merge(shell_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        // Login é a única rota pública além do health
        .route("/auth/login", post(handlers::auth::login))
        .merge(admin_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
