// src/models/gateway.rs

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- PROVEDORES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GatewayProvider {
    Pagarme,
    Mercadopago,
    Stripe,
    Asaas,
}

/// Um campo de credencial. Os secretos saem mascarados.
#[derive(Debug, Clone, Copy)]
pub struct GatewayField {
    pub name: &'static str,
    pub secret: bool,
}

const fn secret(name: &'static str) -> GatewayField {
    GatewayField { name, secret: true }
}

const fn public(name: &'static str) -> GatewayField {
    GatewayField { name, secret: false }
}

const PAGARME_FIELDS: &[GatewayField] = &[secret("api_key"), secret("encryption_key")];
const MERCADOPAGO_FIELDS: &[GatewayField] = &[public("public_key"), secret("access_token")];
const STRIPE_FIELDS: &[GatewayField] = &[
    public("publishable_key"),
    secret("secret_key"),
    secret("webhook_secret"),
];
const ASAAS_FIELDS: &[GatewayField] = &[secret("api_key"), public("wallet_id")];

impl GatewayProvider {
    pub const ALL: [GatewayProvider; 4] = [
        GatewayProvider::Pagarme,
        GatewayProvider::Mercadopago,
        GatewayProvider::Stripe,
        GatewayProvider::Asaas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayProvider::Pagarme => "pagarme",
            GatewayProvider::Mercadopago => "mercadopago",
            GatewayProvider::Stripe => "stripe",
            GatewayProvider::Asaas => "asaas",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GatewayProvider::Pagarme => "Pagar.me",
            GatewayProvider::Mercadopago => "Mercado Pago",
            GatewayProvider::Stripe => "Stripe",
            GatewayProvider::Asaas => "Asaas",
        }
    }

    pub fn fields(&self) -> &'static [GatewayField] {
        match self {
            GatewayProvider::Pagarme => PAGARME_FIELDS,
            GatewayProvider::Mercadopago => MERCADOPAGO_FIELDS,
            GatewayProvider::Stripe => STRIPE_FIELDS,
            GatewayProvider::Asaas => ASAAS_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<GatewayField> {
        self.fields().iter().copied().find(|f| f.name == name)
    }

    /// Chave na tabela plana: `{provedor}_{campo}`.
    pub fn key(&self, field: &str) -> String {
        format!("{}_{}", self.as_str(), field)
    }

    pub fn enabled_key(&self) -> String {
        self.key("enabled")
    }
}

impl fmt::Display for GatewayProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatewayProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GatewayProvider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// Mostra só os 4 últimos caracteres.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

// --- LINHAS E RESPOSTAS ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySetting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettingRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySummary {
    pub provider: GatewayProvider,
    #[schema(example = "Stripe")]
    pub label: String,
    pub enabled: bool,
    /// Campos que já têm valor salvo
    #[schema(example = json!(["publishable_key"]))]
    pub configured_fields: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayFieldView {
    #[schema(example = "secret_key")]
    pub name: String,
    pub secret: bool,
    pub configured: bool,
    /// Valor salvo; campos secretos vêm mascarados
    #[schema(example = "********1234")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayDetail {
    pub provider: GatewayProvider,
    pub label: String,
    pub enabled: bool,
    pub fields: Vec<GatewayFieldView>,
}

// Salvar credenciais. Valores em branco mantêm o que já está salvo.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveGatewayPayload {
    pub enabled: Option<bool>,
    #[schema(example = json!({ "publishable_key": "pk_test_123", "secret_key": "" }))]
    pub fields: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_flat() {
        assert_eq!(GatewayProvider::Stripe.key("secret_key"), "stripe_secret_key");
        assert_eq!(GatewayProvider::Asaas.enabled_key(), "asaas_enabled");
        assert_eq!("mercadopago".parse::<GatewayProvider>(), Ok(GatewayProvider::Mercadopago));
        assert!("paypal".parse::<GatewayProvider>().is_err());
    }

    #[test]
    fn each_provider_lists_its_fields() {
        let names: Vec<_> = GatewayProvider::Stripe.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["publishable_key", "secret_key", "webhook_secret"]);
        assert!(GatewayProvider::Pagarme.field("api_key").is_some_and(|f| f.secret));
        assert!(GatewayProvider::Asaas.field("wallet_id").is_some_and(|f| !f.secret));
        assert!(GatewayProvider::Mercadopago.field("secret_key").is_none());
    }

    #[test]
    fn masking_keeps_last_four() {
        assert_eq!(mask("sk_live_abcd1234"), "************1234");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask(""), "");
    }
}
