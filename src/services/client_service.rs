// src/services/client_service.rs

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        repository::{from_row, to_row},
        DataClient, Direction, Filter, Query, Repository, Table, Update,
    },
    models::{
        agency::Agency,
        auth::{Client, ClientRecord, CreateClientPayload, UpdateClientPayload},
        contact::{self, Contact, ContactsPatch},
    },
    services::auth::AuthService,
};

const EMAIL_UNIQUE: &[(&str, &str)] = &[("email", "email")];

// Falta de papel só chega aqui se o payload não passou pelo `check()`
fn missing_role() -> AppError {
    AppError::RuleViolation { field: "role", code: "required" }
}

#[derive(Clone)]
pub struct ClientService {
    store: Arc<dyn DataClient>,
    clients: Repository<Client>,
    agencies: Repository<Agency>,
    auth: AuthService,
}

impl ClientService {
    pub fn new(store: Arc<dyn DataClient>, auth: AuthService) -> Self {
        Self {
            clients: Repository::new(store.clone(), Table::Clients),
            agencies: Repository::new(store.clone(), Table::Agencies),
            store,
            auth,
        }
    }

    async fn check_agency(&self, agency_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(agency_id) = agency_id {
            if self.agencies.find_by("id", agency_id.to_string()).await?.is_none() {
                return Err(AppError::RuleViolation { field: "agencyId", code: "unknown_agency" });
            }
        }
        Ok(())
    }

    /// Cria a identidade e o perfil juntos.
    pub async fn create(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let (record, password) = ClientRecord::from_create(payload).ok_or_else(missing_role)?;
        self.check_agency(record.agency_id).await?;
        self.auth.register_client(record, &password).await
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        Ok(self.clients.list(&Query::all().order_by("name", Direction::Asc)).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Client, AppError> {
        self.clients
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "client", &[]))
    }

    /// O e-mail do perfil e o da identidade (o do login) mudam juntos.
    pub async fn update(&self, id: Uuid, payload: UpdateClientPayload) -> Result<Client, AppError> {
        let record = ClientRecord::from_update(payload).ok_or_else(missing_role)?;
        self.check_agency(record.agency_id).await?;
        let current = self.get(id).await?;

        let rows = self
            .store
            .update_pair(
                Update::new(
                    Table::Identities,
                    json!({ "email": record.email }),
                    vec![Filter::id(current.identity_id)],
                ),
                Update::new(Table::Clients, to_row(&record)?, vec![Filter::id(id)]),
            )
            .await
            .map_err(|e| AppError::from_store(e, "client", EMAIL_UNIQUE))?;

        let row = rows.into_iter().next().ok_or(AppError::NotFound("client"))?;
        Ok(from_row(row)?)
    }

    /// Apaga a identidade; o perfil vai junto pelo ON DELETE CASCADE.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let client = self.get(id).await?;

        let removed = self
            .store
            .delete(Table::Identities, &[Filter::id(client.identity_id)])
            .await
            .map_err(|e| AppError::from_store(e, "client", &[]))?;
        if removed == 0 {
            return Err(AppError::NotFound("client"));
        }

        tracing::info!("🗑️ Usuário {} removido com a identidade {}", client.email, client.identity_id);
        Ok(())
    }

    pub async fn add_contact(&self, id: Uuid, new_contact: Contact) -> Result<Client, AppError> {
        let mut contacts = self.get(id).await?.contacts;
        contact::add_contact(&mut contacts, new_contact)?;
        self.save_contacts(id, contacts).await
    }

    /// Recusa quando o contato é o único da lista.
    pub async fn remove_contact(&self, id: Uuid, index: usize) -> Result<Client, AppError> {
        let mut contacts = self.get(id).await?.contacts;
        contact::remove_contact(&mut contacts, index)?;
        self.save_contacts(id, contacts).await
    }

    async fn save_contacts(&self, id: Uuid, contacts: Vec<Contact>) -> Result<Client, AppError> {
        self.clients
            .update(id, &ContactsPatch::new(contacts))
            .await
            .map_err(|e| AppError::from_store(e, "client", &[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;
    use crate::models::auth::Role;

    fn service() -> (Arc<MemoryDataClient>, ClientService) {
        let store = Arc::new(MemoryDataClient::new());
        let auth = AuthService::new(store.clone(), "segredo".into(), 1, 4);
        (store.clone(), ClientService::new(store, auth))
    }

    fn payload(email: &str) -> CreateClientPayload {
        CreateClientPayload {
            name: "Maria".into(),
            email: email.into(),
            password: "Abcdef1!".into(),
            confirm_password: "Abcdef1!".into(),
            role: Some(Role::Operator),
            contacts: vec![Contact {
                name: "Maria".into(),
                email: email.into(),
                phone: None,
                primary: true,
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_links_identity_and_profile() {
        let (store, service) = service();
        let client = service.create(payload("a@a.com")).await.unwrap();

        let identities = store.rows(Table::Identities);
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0]["id"], client.identity_id.to_string());
    }

    #[tokio::test]
    async fn duplicate_email_leaves_nothing_behind() {
        let (store, service) = service();
        service.create(payload("a@a.com")).await.unwrap();

        let err = service.create(payload("a@a.com")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { field: "email" }));
        assert_eq!(store.rows(Table::Identities).len(), 1);
        assert_eq!(store.rows(Table::Clients).len(), 1);
    }

    #[tokio::test]
    async fn last_contact_stays() {
        let (_, service) = service();
        let client = service.create(payload("a@a.com")).await.unwrap();

        let err = service.remove_contact(client.id, 0).await.unwrap_err();
        assert!(matches!(err, AppError::RuleViolation { code: "last_contact", .. }));
        assert_eq!(service.get(client.id).await.unwrap().contacts.len(), 1);

        let extra = Contact { name: "João".into(), email: "j@a.com".into(), phone: None, primary: false };
        let with_two = service.add_contact(client.id, extra).await.unwrap();
        assert_eq!(with_two.contacts.len(), 2);

        let back_to_one = service.remove_contact(client.id, 0).await.unwrap();
        assert_eq!(back_to_one.contacts.len(), 1);
        assert!(back_to_one.contacts[0].primary);
    }

    #[tokio::test]
    async fn delete_removes_the_identity_too() {
        let (store, service) = service();
        let client = service.create(payload("a@a.com")).await.unwrap();
        service.delete(client.id).await.unwrap();
        assert!(store.rows(Table::Identities).is_empty());
        assert!(store.rows(Table::Clients).is_empty());
    }

    #[tokio::test]
    async fn email_change_reaches_the_login() {
        let (store, service) = service();
        let client = service.create(payload("a@a.com")).await.unwrap();

        let update = UpdateClientPayload {
            name: "Maria Souza".into(),
            email: "Nova@A.com".into(),
            role: Some(Role::Operator),
            contacts: client.contacts.clone(),
            ..Default::default()
        };
        let updated = service.update(client.id, update).await.unwrap();

        assert_eq!(updated.email, "nova@a.com");
        assert_eq!(store.rows(Table::Identities)[0]["email"], "nova@a.com");
        assert!(service.auth.login("nova@a.com", "Abcdef1!").await.is_ok());
    }

    #[tokio::test]
    async fn taken_email_changes_nothing() {
        let (store, service) = service();
        service.create(payload("a@a.com")).await.unwrap();
        let other = service.create(payload("b@b.com")).await.unwrap();

        let update = UpdateClientPayload {
            name: "Maria".into(),
            email: "a@a.com".into(),
            role: Some(Role::Operator),
            contacts: other.contacts.clone(),
            ..Default::default()
        };
        let err = service.update(other.id, update).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyExists { field: "email" }));
        assert_eq!(service.get(other.id).await.unwrap().email, "b@b.com");
        let emails: Vec<_> = store.rows(Table::Identities).iter().map(|r| r["email"].clone()).collect();
        assert!(emails.contains(&json!("b@b.com")));
    }
}
