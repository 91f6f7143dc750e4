// src/services/agency_service.rs

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DataClient, Direction, Query, Repository, Table},
    models::{
        activity::Activity,
        agency::{
            ActiveFlag, Agency, AgencyPayload, AgencyProfile, AgencyProfilePayload, AgencyProfileRecord,
            AgencyRecord,
        },
        contact::{self, ContactsPatch},
    },
};

const AGENCY_UNIQUE: &[(&str, &str)] = &[("cnpj", "cnpj")];

#[derive(Clone)]
pub struct AgencyService {
    agencies: Repository<Agency>,
    profiles: Repository<AgencyProfile>,
    activities: Repository<Activity>,
}

impl AgencyService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self {
            agencies: Repository::new(store.clone(), Table::Agencies),
            profiles: Repository::new(store.clone(), Table::AgencyProfiles),
            activities: Repository::new(store, Table::Activities),
        }
    }

    // =========================================================================
    //  AGÊNCIAS
    // =========================================================================

    // Perfil e atividades precisam existir antes da gravação
    async fn check_references(&self, record: &AgencyRecord) -> Result<(), AppError> {
        if let Some(profile_id) = record.profile_id {
            if self.profiles.find_by("id", profile_id.to_string()).await?.is_none() {
                return Err(AppError::RuleViolation { field: "profileId", code: "unknown_profile" });
            }
        }

        if !record.activity_ids.is_empty() {
            let known: HashSet<Uuid> = self
                .activities
                .list(&Query::all())
                .await?
                .into_iter()
                .map(|a| a.id)
                .collect();
            if record.activity_ids.iter().any(|id| !known.contains(id)) {
                return Err(AppError::RuleViolation { field: "activityIds", code: "unknown_activity" });
            }
        }
        Ok(())
    }

    pub async fn create(&self, payload: AgencyPayload) -> Result<Agency, AppError> {
        let record = AgencyRecord::from(payload);
        self.check_references(&record).await?;

        let agency = self
            .agencies
            .create(&record)
            .await
            .map_err(|e| AppError::from_store(e, "agency", AGENCY_UNIQUE))?;

        tracing::info!("🏢 Agência {} cadastrada (CNPJ {})", agency.trade_name, agency.cnpj);
        Ok(agency)
    }

    pub async fn list(&self) -> Result<Vec<Agency>, AppError> {
        let query = Query::all().order_by("corporate_name", Direction::Asc);
        Ok(self.agencies.list(&query).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Agency, AppError> {
        self.agencies
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "agency", &[]))
    }

    pub async fn update(&self, id: Uuid, payload: AgencyPayload) -> Result<Agency, AppError> {
        let record = AgencyRecord::from(payload);
        self.check_references(&record).await?;

        self.agencies
            .update(id, &record)
            .await
            .map_err(|e| AppError::from_store(e, "agency", AGENCY_UNIQUE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.agencies
            .remove(id)
            .await
            .map_err(|e| AppError::from_store(e, "agency", &[]))
    }

    pub async fn set_primary_contact(&self, id: Uuid, index: usize) -> Result<Agency, AppError> {
        let mut contacts = self.get(id).await?.contacts;
        contact::set_primary(&mut contacts, index)?;

        self.agencies
            .update(id, &ContactsPatch::new(contacts))
            .await
            .map_err(|e| AppError::from_store(e, "agency", &[]))
    }

    // =========================================================================
    //  PERFIS DE AGÊNCIA
    // =========================================================================

    pub async fn create_profile(&self, payload: AgencyProfilePayload) -> Result<AgencyProfile, AppError> {
        let record = AgencyProfileRecord {
            name: payload.name.trim().to_string(),
            description: payload.description,
            active: Some(true),
            updated_at: Utc::now(),
        };
        Ok(self.profiles.create(&record).await?)
    }

    pub async fn list_profiles(&self) -> Result<Vec<AgencyProfile>, AppError> {
        Ok(self.profiles.list(&Query::all().order_by("name", Direction::Asc)).await?)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        payload: AgencyProfilePayload,
    ) -> Result<AgencyProfile, AppError> {
        let record = AgencyProfileRecord {
            name: payload.name.trim().to_string(),
            description: payload.description,
            active: None,
            updated_at: Utc::now(),
        };
        self.profiles
            .update(id, &record)
            .await
            .map_err(|e| AppError::from_store(e, "agency_profile", &[]))
    }

    /// Exclusão lógica: perfis nunca são apagados, só ativados/desativados.
    pub async fn toggle_profile(&self, id: Uuid) -> Result<AgencyProfile, AppError> {
        let profile = self
            .profiles
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "agency_profile", &[]))?;

        let flag = ActiveFlag { active: !profile.active, updated_at: Utc::now() };
        let updated = self.profiles.update(id, &flag).await?;
        tracing::info!("Perfil {} agora está {}", updated.name, if updated.active { "ativo" } else { "inativo" });
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;
    use crate::models::contact::Contact;

    fn payload(cnpj: &str) -> AgencyPayload {
        AgencyPayload {
            corporate_name: "Viagens Exemplo LTDA".into(),
            trade_name: "Viagens Exemplo".into(),
            cnpj: cnpj.into(),
            contacts: vec![
                Contact { name: "Ana".into(), email: "ana@ex.com".into(), phone: None, primary: true },
                Contact { name: "Bia".into(), email: "bia@ex.com".into(), phone: None, primary: false },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn duplicate_cnpj_is_a_field_error() {
        let service = AgencyService::new(Arc::new(MemoryDataClient::new()));
        service.create(payload("12.345.678/0001-95")).await.unwrap();

        let err = service.create(payload("12345678000195")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { field: "cnpj" }));
    }

    #[tokio::test]
    async fn unknown_references_are_refused() {
        let service = AgencyService::new(Arc::new(MemoryDataClient::new()));

        let mut with_profile = payload("12345678000195");
        with_profile.profile_id = Some(Uuid::new_v4());
        assert!(matches!(
            service.create(with_profile).await,
            Err(AppError::RuleViolation { code: "unknown_profile", .. })
        ));

        let mut with_activity = payload("12345678000195");
        with_activity.activity_ids = vec![Uuid::new_v4()];
        assert!(matches!(
            service.create(with_activity).await,
            Err(AppError::RuleViolation { code: "unknown_activity", .. })
        ));
    }

    #[tokio::test]
    async fn primary_contact_moves() {
        let service = AgencyService::new(Arc::new(MemoryDataClient::new()));
        let agency = service.create(payload("12345678000195")).await.unwrap();

        let updated = service.set_primary_contact(agency.id, 1).await.unwrap();
        assert!(!updated.contacts[0].primary);
        assert!(updated.contacts[1].primary);
    }

    #[tokio::test]
    async fn profiles_are_toggled_not_deleted() {
        let service = AgencyService::new(Arc::new(MemoryDataClient::new()));
        let profile = service
            .create_profile(AgencyProfilePayload { name: "Ouro".into(), description: None })
            .await
            .unwrap();
        assert!(profile.active);

        let off = service.toggle_profile(profile.id).await.unwrap();
        assert!(!off.active);
        assert_eq!(service.list_profiles().await.unwrap().len(), 1);

        let on = service.toggle_profile(profile.id).await.unwrap();
        assert!(on.active);
    }
}
