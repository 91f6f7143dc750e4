// src/services/gateway_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{repository::to_row, DataClient, Query, Repository, Table},
    models::gateway::{
        mask, GatewayDetail, GatewayFieldView, GatewayProvider, GatewaySetting, GatewaySettingRecord,
        GatewaySummary, SaveGatewayPayload,
    },
};

type Stored = HashMap<String, String>;

fn is_enabled(provider: GatewayProvider, stored: &Stored) -> bool {
    stored.get(&provider.enabled_key()).map(String::as_str) == Some("true")
}

fn is_configured(provider: GatewayProvider, field: &str, stored: &Stored) -> bool {
    stored
        .get(&provider.key(field))
        .is_some_and(|v| !v.trim().is_empty())
}

pub fn summary(provider: GatewayProvider, stored: &Stored) -> GatewaySummary {
    GatewaySummary {
        provider,
        label: provider.label().to_string(),
        enabled: is_enabled(provider, stored),
        configured_fields: provider
            .fields()
            .iter()
            .filter(|f| is_configured(provider, f.name, stored))
            .map(|f| f.name.to_string())
            .collect(),
    }
}

pub fn detail(provider: GatewayProvider, stored: &Stored) -> GatewayDetail {
    let fields = provider
        .fields()
        .iter()
        .map(|field| {
            let value = stored
                .get(&provider.key(field.name))
                .filter(|v| !v.trim().is_empty());
            GatewayFieldView {
                name: field.name.to_string(),
                secret: field.secret,
                configured: value.is_some(),
                value: value.map(|v| if field.secret { mask(v) } else { v.clone() }),
            }
        })
        .collect();

    GatewayDetail {
        provider,
        label: provider.label().to_string(),
        enabled: is_enabled(provider, stored),
        fields,
    }
}

/// Pares `chave -> valor` a gravar. Valores em branco mantêm o que já existe;
/// ativar exige todos os campos preenchidos (salvos ou vindos agora).
pub fn plan_save(
    provider: GatewayProvider,
    stored: &Stored,
    payload: &SaveGatewayPayload,
) -> Result<Vec<(String, String)>, AppError> {
    let mut pairs = Vec::new();

    for (name, value) in &payload.fields {
        if provider.field(name).is_none() {
            return Err(AppError::RuleViolation { field: "fields", code: "unknown_gateway_field" });
        }
        let value = value.trim();
        if !value.is_empty() {
            pairs.push((provider.key(name), value.to_string()));
        }
    }

    if let Some(enabled) = payload.enabled {
        if enabled {
            let complete = provider.fields().iter().all(|field| {
                let key = provider.key(field.name);
                pairs.iter().any(|(k, _)| *k == key) || is_configured(provider, field.name, stored)
            });
            if !complete {
                return Err(AppError::RuleViolation { field: "enabled", code: "gateway_incomplete" });
            }
        }
        pairs.push((provider.enabled_key(), enabled.to_string()));
    }

    Ok(pairs)
}

#[derive(Clone)]
pub struct GatewayService {
    store: Arc<dyn DataClient>,
    settings: Repository<GatewaySetting>,
}

impl GatewayService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self {
            settings: Repository::new(store.clone(), Table::GatewaySettings),
            store,
        }
    }

    async fn stored(&self) -> Result<Stored, AppError> {
        Ok(self
            .settings
            .list(&Query::all())
            .await?
            .into_iter()
            .map(|s| (s.key, s.value))
            .collect())
    }

    pub async fn list(&self) -> Result<Vec<GatewaySummary>, AppError> {
        let stored = self.stored().await?;
        Ok(GatewayProvider::ALL.into_iter().map(|p| summary(p, &stored)).collect())
    }

    pub async fn get(&self, provider: GatewayProvider) -> Result<GatewayDetail, AppError> {
        let stored = self.stored().await?;
        Ok(detail(provider, &stored))
    }

    /// Todos os pares vão numa única gravação transacional.
    pub async fn save(
        &self,
        provider: GatewayProvider,
        payload: SaveGatewayPayload,
    ) -> Result<GatewayDetail, AppError> {
        let mut stored = self.stored().await?;
        let pairs = plan_save(provider, &stored, &payload)?;

        if !pairs.is_empty() {
            let now = Utc::now();
            let rows = pairs
                .iter()
                .map(|(key, value)| {
                    to_row(&GatewaySettingRecord { key: key.clone(), value: value.clone(), updated_at: now })
                })
                .collect::<Result<Vec<_>, _>>()?;

            self.store.upsert_many(Table::GatewaySettings, rows, "key").await?;
            tracing::info!("🔐 Credenciais do gateway {} atualizadas ({} campos)", provider, pairs.len());
            stored.extend(pairs);
        }

        Ok(detail(provider, &stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;

    fn save(fields: &[(&str, &str)], enabled: Option<bool>) -> SaveGatewayPayload {
        SaveGatewayPayload {
            enabled,
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = plan_save(GatewayProvider::Stripe, &Stored::new(), &save(&[("api_key", "x")], None))
            .unwrap_err();
        assert!(matches!(err, AppError::RuleViolation { code: "unknown_gateway_field", .. }));
    }

    #[test]
    fn enabling_needs_every_field() {
        let partial = save(&[("publishable_key", "pk_1")], Some(true));
        assert!(plan_save(GatewayProvider::Stripe, &Stored::new(), &partial).is_err());

        let mut stored = Stored::new();
        stored.insert("stripe_secret_key".into(), "sk_1234567".into());
        stored.insert("stripe_webhook_secret".into(), "whsec_abcdef".into());
        let pairs = plan_save(GatewayProvider::Stripe, &stored, &partial).unwrap();
        assert!(pairs.contains(&("stripe_enabled".to_string(), "true".to_string())));
    }

    #[test]
    fn blank_values_keep_the_stored_secret() {
        let pairs = plan_save(
            GatewayProvider::Asaas,
            &Stored::new(),
            &save(&[("api_key", "  "), ("wallet_id", "w-1")], None),
        )
        .unwrap();
        assert_eq!(pairs, vec![("asaas_wallet_id".to_string(), "w-1".to_string())]);
    }

    #[tokio::test]
    async fn secrets_come_back_masked() {
        let store = Arc::new(MemoryDataClient::new());
        let service = GatewayService::new(store.clone());

        let payload = save(&[("public_key", "APP_USR-pub"), ("access_token", "APP_USR-secret-9876")], Some(true));
        let detail = service.save(GatewayProvider::Mercadopago, payload).await.unwrap();
        assert!(detail.enabled);

        let token = detail.fields.iter().find(|f| f.name == "access_token").unwrap();
        assert_eq!(token.value.as_deref().map(|v| v.ends_with("9876")), Some(true));
        assert!(!token.value.as_deref().unwrap_or_default().contains("secret"));

        let public = detail.fields.iter().find(|f| f.name == "public_key").unwrap();
        assert_eq!(public.value.as_deref(), Some("APP_USR-pub"));

        // três pares numa única chamada
        assert_eq!(store.rows(Table::GatewaySettings).len(), 3);

        let summaries = service.list().await.unwrap();
        assert_eq!(summaries.len(), 4);
        let mp = summaries.iter().find(|s| s.provider == GatewayProvider::Mercadopago).unwrap();
        assert!(mp.enabled);
        assert_eq!(mp.configured_fields.len(), 2);
    }
}
