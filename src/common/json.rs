// src/common/json.rs

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    common::{error::ApiError, i18n::I18nStore},
    config::AppState,
    middleware::i18n::Locale,
};

/// Igual ao `Json<T>` do axum, mas a rejeição sai no formato `{error, details}`
/// e no idioma do cliente.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T> FromRequest<AppState> for ApiJson<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let locale = Locale::from_request_parts(&mut parts, state).await.unwrap_or_default();

        match Json::<T>::from_request(Request::from_parts(parts, body), state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_api_error(rejection, &locale, &state.i18n_store)),
        }
    }
}

// Mantém o status que o axum escolheu (400, 415, 422...) e põe o motivo em
// `details.body`.
pub fn rejection_to_api_error(rejection: JsonRejection, locale: &Locale, i18n: &I18nStore) -> ApiError {
    let code = match rejection {
        JsonRejection::MissingJsonContentType(_) => "expected_json",
        _ => "invalid_body",
    };
    tracing::debug!("Corpo JSON rejeitado: {}", rejection.body_text());

    ApiError {
        status: rejection.status(),
        error: i18n.translate(&locale.0, code),
        details: Some(json!({ "body": [rejection.body_text()] })),
    }
}
