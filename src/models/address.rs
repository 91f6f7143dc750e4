// src/models/address.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{form::blank_as_none, validation::validate_cep};

// Endereço embutido (coluna jsonb). Campos em branco viram null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(deserialize_with = "blank_as_none")]
    #[validate(custom(function = "validate_cep"))]
    #[schema(example = "01310-100")]
    pub postal_code: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "Avenida Paulista")]
    pub street: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "1000")]
    pub number: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    pub complement: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "Bela Vista")]
    pub district: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "São Paulo")]
    pub city: Option<String>,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "SP")]
    pub state: Option<String>,
}
