// src/models/company.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    form::lenient_decimal,
    listing::Searchable,
    validation::validate_non_negative,
};
use crate::models::mileage::{validate_tiers, MileageTier};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Brl,
    Usd,
    Eur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Nationality {
    National,
    International,
}

// --- COMPANHIA AÉREA ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    #[schema(example = "Companhia Exemplo")]
    pub name: String,
    #[schema(value_type = f64, example = 35.9)]
    pub boarding_fee: Decimal,
    #[schema(value_type = f64, example = 20.0)]
    pub service_fee: Decimal,
    pub currency: Currency,
    pub nationality: Nationality,
    pub mileage_tiers: Vec<MileageTier>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Company {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Companhia Exemplo")]
    pub name: String,

    #[serde(deserialize_with = "lenient_decimal")]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = f64, example = 35.9)]
    pub boarding_fee: Decimal,

    #[serde(deserialize_with = "lenient_decimal")]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = f64, example = 20.0)]
    pub service_fee: Decimal,

    #[validate(required(message = "required"))]
    pub currency: Option<Currency>,

    #[validate(required(message = "required"))]
    pub nationality: Option<Nationality>,

    #[validate(custom(function = "validate_tiers"))]
    pub mileage_tiers: Vec<MileageTier>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: String,
    pub boarding_fee: Decimal,
    pub service_fee: Decimal,
    pub currency: Currency,
    pub nationality: Nationality,
    pub mileage_tiers: Vec<MileageTier>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyRecord {
    /// Só deve ser chamado depois do `validate()`, que garante os campos obrigatórios.
    pub fn from_payload(payload: CompanyPayload) -> Option<Self> {
        Some(Self {
            name: payload.name.trim().to_string(),
            boarding_fee: payload.boarding_fee,
            service_fee: payload.service_fee,
            currency: payload.currency?,
            nationality: payload.nationality?,
            mileage_tiers: payload.mileage_tiers,
            updated_at: Utc::now(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TiersPatch {
    pub mileage_tiers: Vec<MileageTier>,
    pub updated_at: DateTime<Utc>,
}

impl TiersPatch {
    pub fn new(mileage_tiers: Vec<MileageTier>) -> Self {
        Self { mileage_tiers, updated_at: Utc::now() }
    }
}

// Nova faixa: começa em `min` e fica sem limite superior
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddTierPayload {
    #[schema(example = 10001)]
    pub min: i64,
    #[serde(deserialize_with = "lenient_decimal")]
    #[schema(value_type = f64, example = 18.0)]
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_fees_and_required_enums() {
        let payload: CompanyPayload = serde_json::from_value(json!({
            "name": "Companhia Exemplo",
            "boardingFee": "",
            "serviceFee": "12,5",
            "mileageTiers": [{ "min": 1, "max": null, "price": 20 }]
        }))
        .unwrap();
        assert_eq!(payload.boarding_fee, Decimal::ZERO);
        assert_eq!(payload.service_fee, Decimal::new(125, 1));

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("currency"));
        assert!(errors.field_errors().contains_key("nationality"));
    }

    #[test]
    fn currency_wire_format() {
        assert_eq!(serde_json::to_value(Currency::Brl).unwrap(), json!("BRL"));
        assert_eq!(serde_json::to_value(Nationality::International).unwrap(), json!("international"));
    }
}
