// src/models/agency.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    form::{blank_as_none, lenient_i64},
    listing::Searchable,
    validation::{digits_only, validate_cnpj},
};
use crate::models::{
    address::Address,
    contact::{validate_contacts, Contact},
};

// --- PERFIS DE AGÊNCIA ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyProfile {
    pub id: Uuid,
    #[schema(example = "Parceira Ouro")]
    pub name: String,
    pub description: Option<String>,
    /// Perfis inativos continuam no banco (exclusão lógica)
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for AgencyProfile {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_deref().unwrap_or_default()]
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AgencyProfilePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Parceira Ouro")]
    pub name: String,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "Agências com limite ampliado")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyProfileRecord {
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFlag {
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

// --- AGÊNCIAS ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: Uuid,
    #[schema(example = "Viagens Exemplo LTDA")]
    pub corporate_name: String,
    #[schema(example = "Viagens Exemplo")]
    pub trade_name: String,
    /// Só dígitos
    #[schema(example = "12345678000195")]
    pub cnpj: String,
    pub contacts: Vec<Contact>,
    pub address: Option<Address>,
    #[schema(example = 50)]
    pub consultation_limit: i64,
    pub profile_id: Option<Uuid>,
    #[serde(default)]
    pub activity_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Agency {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.corporate_name.as_str(), self.trade_name.as_str(), self.cnpj.as_str()]
    }
}

// Dados do formulário de agência (criação e edição)
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AgencyPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Viagens Exemplo LTDA")]
    pub corporate_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Viagens Exemplo")]
    pub trade_name: String,

    #[validate(length(min = 1, message = "required"), custom(function = "validate_cnpj"))]
    #[schema(example = "12.345.678/0001-95")]
    pub cnpj: String,

    #[validate(custom(function = "validate_contacts"))]
    pub contacts: Vec<Contact>,

    #[validate(nested)]
    pub address: Option<Address>,

    #[serde(deserialize_with = "lenient_i64")]
    #[validate(range(min = 0, message = "negative_value"))]
    #[schema(example = 50)]
    pub consultation_limit: i64,

    pub profile_id: Option<Uuid>,

    pub activity_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyRecord {
    pub corporate_name: String,
    pub trade_name: String,
    pub cnpj: String,
    pub contacts: Vec<Contact>,
    pub address: Option<Address>,
    pub consultation_limit: i64,
    pub profile_id: Option<Uuid>,
    pub activity_ids: Vec<Uuid>,
    pub updated_at: DateTime<Utc>,
}

impl From<AgencyPayload> for AgencyRecord {
    fn from(payload: AgencyPayload) -> Self {
        Self {
            corporate_name: payload.corporate_name.trim().to_string(),
            trade_name: payload.trade_name.trim().to_string(),
            cnpj: digits_only(&payload.cnpj),
            contacts: payload.contacts,
            address: payload.address,
            consultation_limit: payload.consultation_limit,
            profile_id: payload.profile_id,
            activity_ids: payload.activity_ids,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryContactPayload {
    /// Posição do contato na lista (começa em 0)
    #[schema(example = 1)]
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> serde_json::Value {
        json!({
            "corporateName": "Viagens Exemplo LTDA",
            "tradeName": "Viagens Exemplo",
            "cnpj": "12.345.678/0001-95",
            "contacts": [{ "name": "Ana", "email": "ana@exemplo.com", "primary": true }],
            "consultationLimit": "abc"
        })
    }

    #[test]
    fn valid_payload_becomes_a_clean_record() {
        let payload: AgencyPayload = serde_json::from_value(payload()).unwrap();
        assert!(payload.validate().is_ok());

        let record = AgencyRecord::from(payload);
        assert_eq!(record.cnpj, "12345678000195");
        assert_eq!(record.consultation_limit, 0);
    }

    #[test]
    fn contacts_need_one_primary() {
        let mut raw = payload();
        raw["contacts"] = json!([
            { "name": "Ana", "email": "ana@exemplo.com", "primary": false }
        ]);
        let payload: AgencyPayload = serde_json::from_value(raw).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("contacts"));
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let payload: AgencyPayload = serde_json::from_value(json!({})).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("corporate_name"));
        assert!(fields.contains_key("trade_name"));
        assert!(fields.contains_key("cnpj"));
        assert!(fields.contains_key("contacts"));
    }

    #[test]
    fn limit_beyond_32_bits_is_kept() {
        let mut raw = payload();
        raw["consultationLimit"] = json!(3_000_000_000i64);
        let payload: AgencyPayload = serde_json::from_value(raw).unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(AgencyRecord::from(payload).consultation_limit, 3_000_000_000);
    }
}
