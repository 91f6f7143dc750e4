// src/models/bank.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{listing::Searchable, validation::validate_bank_code};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bank {
    pub id: Uuid,
    /// Código de compensação, imutável depois de criado
    #[schema(example = "001")]
    pub code: String,
    #[schema(example = "Banco Exemplo")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Bank {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

// Dados para cadastrar um banco
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBankPayload {
    #[validate(custom(function = "validate_bank_code"))]
    #[schema(example = "001")]
    pub code: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Banco Exemplo")]
    pub name: String,
}

// Na edição só o nome muda
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBankPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Banco Exemplo S.A.")]
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBank {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankNamePatch {
    pub name: String,
    pub updated_at: DateTime<Utc>,
}
