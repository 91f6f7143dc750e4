// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        repository::{from_row, to_row},
        DataClient, Repository, Table,
    },
    models::{
        auth::{Claims, Client, ClientRecord, Identity, MeResponse, NewIdentity, Role},
        contact::Contact,
    },
};

const IDENTITY_UNIQUE: &[(&str, &str)] = &[("email", "email")];

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn DataClient>,
    identities: Repository<Identity>,
    clients: Repository<Client>,
    jwt_secret: String,
    token_ttl_hours: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn DataClient>, jwt_secret: String, token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            identities: Repository::new(store.clone(), Table::Identities),
            clients: Repository::new(store.clone(), Table::Clients),
            store,
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
        }
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    /// Cria só a credencial (identidade).
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let record = NewIdentity {
            email: email.trim().to_lowercase(),
            password_hash: self.hash_password(password).await?,
        };

        self.identities
            .create(&record)
            .await
            .map_err(|e| AppError::from_store(e, "identity", IDENTITY_UNIQUE))
    }

    /// Identidade e perfil numa única transação: ou os dois existem, ou nenhum.
    pub async fn register_client(&self, profile: ClientRecord, password: &str) -> Result<Client, AppError> {
        let identity = NewIdentity {
            email: profile.email.clone(),
            password_hash: self.hash_password(password).await?,
        };

        let (_, client_row) = self
            .store
            .insert_linked(
                Table::Identities,
                to_row(&identity)?,
                Table::Clients,
                to_row(&profile)?,
                "identity_id",
            )
            .await
            .map_err(|e| AppError::from_store(e, "client", IDENTITY_UNIQUE))?;

        let client: Client = from_row(client_row)?;
        tracing::info!("👤 Usuário {} criado com papel {:?}", client.email, client.role);
        Ok(client)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let identity = self
            .identities
            .find_by("email", email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = identity.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Só admin e operador entram no back-office
        let profile = self.clients.find_by("identity_id", identity.id.to_string()).await?;
        match profile {
            Some(client) if client.role.is_backoffice() => self.create_token(identity.id),
            _ => {
                tracing::warn!("Login negado ao back-office para {}", identity.email);
                Err(AppError::Forbidden)
            }
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<Identity, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let identity = self
            .identities
            .find_by("id", token_data.claims.sub.to_string())
            .await?
            .ok_or(AppError::InvalidToken)?;

        // O papel pode ter mudado depois do login; vale o que está salvo agora
        let profile = self.clients.find_by("identity_id", identity.id.to_string()).await?;
        match profile {
            Some(client) if client.role.is_backoffice() => Ok(identity),
            _ => {
                tracing::warn!("Token de {} recusado: sem acesso ao back-office", identity.email);
                Err(AppError::Forbidden)
            }
        }
    }

    pub async fn me(&self, identity: Identity) -> Result<MeResponse, AppError> {
        let profile = self.clients.find_by("identity_id", identity.id.to_string()).await?;
        Ok(MeResponse { identity, profile })
    }

    /// Garante um administrador inicial. Devolve `true` se criou.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = email.trim().to_lowercase();
        if self.identities.find_by("email", email.clone()).await?.is_some() {
            return Ok(false);
        }

        let profile = ClientRecord {
            name: "Administrador".into(),
            email: email.clone(),
            cpf: None,
            phone: None,
            address: None,
            role: Role::Admin,
            agency_id: None,
            contacts: vec![Contact {
                name: "Administrador".into(),
                email,
                phone: None,
                primary: true,
            }],
            updated_at: Utc::now(),
        };

        self.register_client(profile, password).await?;
        Ok(true)
    }

    pub fn create_token(&self, identity_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: identity_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;

    fn service() -> (Arc<MemoryDataClient>, AuthService) {
        let store = Arc::new(MemoryDataClient::new());
        let auth = AuthService::new(store.clone(), "segredo".into(), 1, 4);
        (store, auth)
    }

    #[tokio::test]
    async fn bootstrap_admin_can_log_in_once_created() {
        let (_, auth) = service();
        assert!(auth.ensure_admin("Admin@Agencia.com", "Abcdef1!").await.unwrap());
        assert!(!auth.ensure_admin("admin@agencia.com", "Abcdef1!").await.unwrap());

        let token = auth.login("admin@agencia.com", "Abcdef1!").await.unwrap();
        let identity = auth.validate_token(&token).await.unwrap();
        assert_eq!(identity.email, "admin@agencia.com");

        assert!(matches!(
            auth.login("admin@agencia.com", "errada").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(auth.validate_token("lixo").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn identities_without_backoffice_role_are_refused() {
        let (_, auth) = service();
        auth.sign_up("agente@agencia.com", "Abcdef1!").await.unwrap();
        assert!(matches!(
            auth.login("agente@agencia.com", "Abcdef1!").await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_on_the_field() {
        let (store, auth) = service();
        auth.sign_up("a@a.com", "Abcdef1!").await.unwrap();
        let err = auth.sign_up("A@A.com", "Abcdef1!").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { field: "email" }));
        assert_eq!(store.rows(Table::Identities).len(), 1);
    }

    #[tokio::test]
    async fn demoted_user_loses_access_with_an_old_token() {
        let (store, auth) = service();
        auth.ensure_admin("admin@agencia.com", "Abcdef1!").await.unwrap();
        let token = auth.login("admin@agencia.com", "Abcdef1!").await.unwrap();
        assert!(auth.validate_token(&token).await.is_ok());

        store
            .update(
                Table::Clients,
                serde_json::json!({ "role": "agent" }),
                &[crate::db::Filter::eq("email", "admin@agencia.com")],
            )
            .await
            .unwrap();

        assert!(matches!(auth.validate_token(&token).await, Err(AppError::Forbidden)));
    }
}
