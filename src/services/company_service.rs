// src/services/company_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DataClient, Direction, Query, Repository, Table},
    models::{
        company::{Company, CompanyPayload, CompanyRecord, TiersPatch},
        mileage::{self, MileageTier},
    },
};

fn incomplete() -> AppError {
    AppError::RuleViolation { field: "currency", code: "required" }
}

#[derive(Clone)]
pub struct CompanyService {
    repo: Repository<Company>,
}

impl CompanyService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self { repo: Repository::new(store, Table::Companies) }
    }

    pub async fn create(&self, payload: CompanyPayload) -> Result<Company, AppError> {
        let record = CompanyRecord::from_payload(payload).ok_or_else(incomplete)?;
        let company = self.repo.create(&record).await?;
        tracing::info!("✈️ Companhia {} cadastrada com {} faixas", company.name, company.mileage_tiers.len());
        Ok(company)
    }

    pub async fn list(&self) -> Result<Vec<Company>, AppError> {
        Ok(self.repo.list(&Query::all().order_by("name", Direction::Asc)).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Company, AppError> {
        self.repo
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "company", &[]))
    }

    pub async fn update(&self, id: Uuid, payload: CompanyPayload) -> Result<Company, AppError> {
        let record = CompanyRecord::from_payload(payload).ok_or_else(incomplete)?;
        self.repo
            .update(id, &record)
            .await
            .map_err(|e| AppError::from_store(e, "company", &[]))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo
            .remove(id)
            .await
            .map_err(|e| AppError::from_store(e, "company", &[]))
    }

    pub async fn add_tier(&self, id: Uuid, min: i64, price: Decimal) -> Result<Company, AppError> {
        let mut tiers = self.get(id).await?.mileage_tiers;
        mileage::add_tier(&mut tiers, min, price)?;
        self.save_tiers(id, tiers).await
    }

    pub async fn remove_tier(&self, id: Uuid, index: usize) -> Result<Company, AppError> {
        let mut tiers = self.get(id).await?.mileage_tiers;
        mileage::remove_tier(&mut tiers, index)?;
        self.save_tiers(id, tiers).await
    }

    async fn save_tiers(&self, id: Uuid, tiers: Vec<MileageTier>) -> Result<Company, AppError> {
        self.repo
            .update(id, &TiersPatch::new(tiers))
            .await
            .map_err(|e| AppError::from_store(e, "company", &[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;
    use crate::models::company::{Currency, Nationality};

    fn payload() -> CompanyPayload {
        CompanyPayload {
            name: "Companhia Exemplo".into(),
            boarding_fee: Decimal::new(3590, 2),
            service_fee: Decimal::ZERO,
            currency: Some(Currency::Brl),
            nationality: Some(Nationality::National),
            mileage_tiers: vec![MileageTier { min: 1, max: None, price: Decimal::new(20, 0) }],
        }
    }

    #[tokio::test]
    async fn tiers_stay_contiguous_through_the_service() {
        let service = CompanyService::new(Arc::new(MemoryDataClient::new()));
        let company = service.create(payload()).await.unwrap();

        let company = service.add_tier(company.id, 10_001, Decimal::new(18, 0)).await.unwrap();
        assert_eq!(company.mileage_tiers[0].max, Some(10_000));
        assert_eq!(company.mileage_tiers[1].max, None);
        assert!(mileage::validate_tiers(&company.mileage_tiers).is_ok());

        let company = service.remove_tier(company.id, 1).await.unwrap();
        assert_eq!(company.mileage_tiers.len(), 1);
        assert_eq!(company.mileage_tiers[0].max, None);

        assert!(service.remove_tier(company.id, 0).await.is_err());
    }
}
