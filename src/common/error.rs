use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::{
    common::i18n::I18nStore,
    db::{repository::camel_case, StoreError},
    middleware::i18n::Locale,
};

// Nosso tipo de erro da camada de serviço, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    // Violação de unicidade reconhecida: vira erro no campo correspondente
    #[error("Valor já cadastrado no campo {field}")]
    AlreadyExists { field: &'static str },

    // Regra de lista (contatos, faixas de milhas) que a operação quebraria
    #[error("Regra violada no campo {field}: {code}")]
    RuleViolation {
        field: &'static str,
        code: &'static str,
    },

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Registro referenciado por outros cadastros")]
    Referenced,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Erro no cliente de dados: {0}")]
    Store(#[from] StoreError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Converte um erro do cliente de dados considerando a entidade e quais
    /// colunas únicas correspondem a campos do formulário.
    pub fn from_store(
        err: StoreError,
        entity: &'static str,
        unique_fields: &[(&str, &'static str)],
    ) -> Self {
        match err {
            StoreError::UniqueViolation { column: Some(ref column), .. } => unique_fields
                .iter()
                .find(|(c, _)| *c == column.as_str())
                .map(|(_, field)| AppError::AlreadyExists { field: *field })
                .unwrap_or(AppError::Store(err)),
            StoreError::NotFound => AppError::NotFound(entity),
            StoreError::ForeignKeyViolation { .. } => AppError::Referenced,
            other => AppError::Store(other),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let t = |code: &str| i18n.translate(lang, code);

        let simple = |status: StatusCode, code: &str| ApiError {
            status,
            error: t(code),
            details: None,
        };

        match self {
            // Retorna todos os detalhes da validação, já traduzidos
            AppError::ValidationError(errors) => {
                let details: BTreeMap<String, Vec<String>> = field_errors(errors)
                    .into_iter()
                    .map(|(field, codes)| (field, codes.iter().map(|c| t(c.as_str())).collect()))
                    .collect();
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: t("invalid_fields"),
                    details: Some(json!(details)),
                }
            }
            AppError::AlreadyExists { field } => ApiError {
                status: StatusCode::CONFLICT,
                error: t("already_exists"),
                details: Some(json!({ *field: [t("already_exists")] })),
            },
            AppError::RuleViolation { field, code } => ApiError {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: t(*code),
                details: Some(json!({ *field: [t(*code)] })),
            },
            AppError::NotFound(entity) => ApiError {
                status: StatusCode::NOT_FOUND,
                error: t("not_found"),
                details: Some(json!({ "entity": entity })),
            },
            AppError::InvalidTransition { from, to } => ApiError {
                status: StatusCode::CONFLICT,
                error: t("invalid_transition"),
                details: Some(json!({ "from": from, "to": to })),
            },
            AppError::Referenced => simple(StatusCode::CONFLICT, "referenced"),
            AppError::InvalidCredentials => simple(StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => simple(StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::Forbidden => simple(StatusCode::FORBIDDEN, "forbidden"),

            AppError::Store(store_err) => match store_err {
                StoreError::UniqueViolation { .. } => simple(StatusCode::CONFLICT, "already_exists"),
                StoreError::ForeignKeyViolation { .. } => simple(StatusCode::CONFLICT, "referenced"),
                StoreError::NotFound => simple(StatusCode::NOT_FOUND, "not_found"),
                StoreError::Unavailable(_) => {
                    tracing::error!("Banco de dados indisponível: {}", store_err);
                    simple(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
                }
                StoreError::InvalidIdentifier(_)
                | StoreError::Database(_)
                | StoreError::Decode(_) => {
                    tracing::error!("Erro no cliente de dados: {}", store_err);
                    simple(StatusCode::INTERNAL_SERVER_ERROR, "internal")
                }
            },

            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            AppError::InternalServerError(_) | AppError::BcryptError(_) | AppError::JwtError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                simple(StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

// Usado quando não há locale à mão (middleware, extratores)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}

// ---
// Resposta de erro da API
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Achata os erros do validator em `campo -> códigos`, com o nome do campo no
/// formato do JSON (camelCase). Listas e structs aninhadas viram
/// `contatos[0].email`.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect(errors, None, &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let name = camel_case(&field.to_string());
        let path = match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name,
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let codes = list.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                out.entry(path).or_default().extend(codes);
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn field_names_follow_the_wire_format() {
        assert_eq!(camel_case("confirm_password"), "confirmPassword");
        assert_eq!(camel_case("code"), "code");
    }

    #[test]
    fn unique_violation_on_known_column_becomes_field_error() {
        let err = AppError::from_store(
            StoreError::UniqueViolation { table: "banks", column: Some("code".into()) },
            "bank",
            &[("code", "code")],
        );
        assert!(matches!(err, AppError::AlreadyExists { field: "code" }));

        let api = err.to_api_error(&Locale("pt".into()), &I18nStore::default());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.details.unwrap().get("code").is_some());
    }

    #[test]
    fn unknown_unique_column_stays_generic() {
        let err = AppError::from_store(
            StoreError::UniqueViolation { table: "banks", column: Some("other".into()) },
            "bank",
            &[("code", "code")],
        );
        assert!(matches!(err, AppError::Store(StoreError::UniqueViolation { .. })));
        let api = err.to_api_error(&Locale::default(), &I18nStore::default());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.details.is_none());
    }

    #[test]
    fn store_kinds_map_to_status_codes() {
        let cases = [
            (StoreError::NotFound, StatusCode::NOT_FOUND),
            (StoreError::Unavailable("timeout".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Database("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::ForeignKeyViolation { table: "agencies" }, StatusCode::CONFLICT),
        ];
        for (store_err, status) in cases {
            let api = AppError::Store(store_err).to_api_error(&Locale::default(), &I18nStore::default());
            assert_eq!(api.status, status);
        }
    }

    #[test]
    fn validation_details_are_translated() {
        let mut errors = ValidationErrors::new();
        let mut e = ValidationError::new("length");
        e.message = Some("required".into());
        errors.add("corporate_name", e);

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale("en".into()), &I18nStore::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["corporateName"][0], "This field is required.");
    }
}
