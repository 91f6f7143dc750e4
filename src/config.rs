// src/config.rs

use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{DataClient, MemoryDataClient, PgDataClient},
    services::{
        ActivityService, AgencyService, AuthService, BankService, ClientService, CompanyService,
        ContentService, GatewayService, OrderService, PostalService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND desconhecido: {other}")),
        }
    }
}

// Configurações lidas do ambiente (`.env` incluído)
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub postal_lookup_url: String,
    pub postal_lookup_timeout: Duration,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// Vazio = só mesma origem
    pub cors_allowed_origins: Vec<HeaderValue>,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} inválido ({raw}): {e}")),
        None => Ok(default),
    }
}

// Lista separada por vírgulas; entradas em branco são ignoradas.
fn parse_origins(raw: Option<String>) -> anyhow::Result<Vec<HeaderValue>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| anyhow!("CORS_ALLOWED_ORIGINS inválido ({origin}): {e}"))
        })
        .collect()
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta as configurações a partir de qualquer fonte de chaves.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = optional("DATABASE_URL");
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow!("DATABASE_URL deve ser definida"));
        }

        let jwt_secret = optional("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let default_page_size = parse_or(&lookup, "DEFAULT_PAGE_SIZE", 10usize)?.max(1);
        let max_page_size = parse_or(&lookup, "MAX_PAGE_SIZE", 100usize)?.max(default_page_size);

        Ok(Self {
            store_backend,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            token_ttl_hours: parse_or(&lookup, "TOKEN_TTL_HOURS", 168)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            default_page_size,
            max_page_size,
            postal_lookup_url: optional("POSTAL_LOOKUP_URL")
                .unwrap_or_else(|| "https://viacep.com.br/ws".into()),
            postal_lookup_timeout: Duration::from_secs(parse_or(&lookup, "POSTAL_LOOKUP_TIMEOUT_SECS", 5)?),
            admin_email: optional("ADMIN_EMAIL"),
            admin_password: optional("ADMIN_PASSWORD"),
            cors_allowed_origins: parse_origins(optional("CORS_ALLOWED_ORIGINS"))?,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataClient>,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub agency_service: AgencyService,
    pub client_service: ClientService,
    pub activity_service: ActivityService,
    pub bank_service: BankService,
    pub company_service: CompanyService,
    pub gateway_service: GatewayService,
    pub content_service: ContentService,
    pub order_service: OrderService,
    pub postal_service: PostalService,
}

impl AppState {
    /// Conecta no backend configurado, roda as migrações e garante o admin inicial.
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn DataClient> = match settings.store_backend {
            StoreBackend::Postgres => {
                let database_url = settings
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(settings.db_max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!().run(&db_pool).await?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                Arc::new(PgDataClient::new(db_pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("⚠️ Usando o backend em memória: nada será persistido");
                Arc::new(MemoryDataClient::new())
            }
        };

        let state = Self::from_store(store, settings)?;

        if let (Some(email), Some(password)) = (&state.settings.admin_email, &state.settings.admin_password) {
            if state.auth_service.ensure_admin(email, password).await? {
                tracing::info!("👑 Administrador inicial {} criado", email);
            }
        }

        Ok(state)
    }

    /// Monta o gráfico de dependências sobre um cliente de dados já pronto.
    pub fn from_store(store: Arc<dyn DataClient>, settings: Settings) -> anyhow::Result<Self> {
        let auth_service = AuthService::new(
            store.clone(),
            settings.jwt_secret.clone(),
            settings.token_ttl_hours,
            settings.bcrypt_cost,
        );
        let postal_service = PostalService::new(&settings.postal_lookup_url, settings.postal_lookup_timeout)?;

        Ok(Self {
            agency_service: AgencyService::new(store.clone()),
            client_service: ClientService::new(store.clone(), auth_service.clone()),
            activity_service: ActivityService::new(store.clone()),
            bank_service: BankService::new(store.clone()),
            company_service: CompanyService::new(store.clone()),
            gateway_service: GatewayService::new(store.clone()),
            content_service: ContentService::new(store.clone()),
            order_service: OrderService::new(store.clone()),
            auth_service,
            postal_service,
            store,
            settings: Arc::new(settings),
            i18n_store: Arc::new(I18nStore::default()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let settings = Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(settings.store_backend, StoreBackend::Memory);
        assert_eq!(settings.bind_addr, "0.0.0.0:3000");
        assert_eq!(settings.token_ttl_hours, 168);
        assert_eq!(settings.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(settings.default_page_size, 10);
        assert_eq!(settings.max_page_size, 100);
        assert_eq!(settings.postal_lookup_timeout, Duration::from_secs(5));
        assert!(settings.admin_email.is_none());
        assert!(settings.cors_allowed_origins.is_empty());
    }

    #[test]
    fn cors_origins_are_split_and_checked() {
        let settings = Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "segredo"),
            ("CORS_ALLOWED_ORIGINS", "https://painel.agencia.com.br, ,http://localhost:5173"),
        ]))
        .unwrap();
        assert_eq!(
            settings.cors_allowed_origins,
            vec![
                HeaderValue::from_static("https://painel.agencia.com.br"),
                HeaderValue::from_static("http://localhost:5173"),
            ]
        );

        assert!(Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "segredo"),
            ("CORS_ALLOWED_ORIGINS", "https://ok.com,bad\norigin"),
        ]))
        .is_err());
    }

    #[test]
    fn postgres_needs_a_database_url() {
        let err = Settings::from_lookup(lookup(&[("JWT_SECRET", "segredo")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let ok = Settings::from_lookup(lookup(&[
            ("JWT_SECRET", "segredo"),
            ("DATABASE_URL", "postgres://localhost/backoffice"),
        ]));
        assert!(ok.is_ok());
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(Settings::from_lookup(lookup(&[("STORE_BACKEND", "memory")])).is_err());
        assert!(Settings::from_lookup(lookup(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "segredo"),
            ("BCRYPT_COST", "muito"),
        ]))
        .is_err());
        assert!(Settings::from_lookup(lookup(&[("STORE_BACKEND", "mongo"), ("JWT_SECRET", "x")])).is_err());
    }
}
