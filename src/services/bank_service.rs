// src/services/bank_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DataClient, Direction, Query, Repository, Table},
    models::bank::{Bank, BankNamePatch, CreateBankPayload, NewBank, UpdateBankPayload},
};

const BANK_UNIQUE: &[(&str, &str)] = &[("code", "code")];

#[derive(Clone)]
pub struct BankService {
    repo: Repository<Bank>,
}

impl BankService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self { repo: Repository::new(store, Table::Banks) }
    }

    pub async fn create(&self, payload: CreateBankPayload) -> Result<Bank, AppError> {
        let record = NewBank {
            code: payload.code,
            name: payload.name.trim().to_string(),
        };

        let bank = self
            .repo
            .create(&record)
            .await
            .map_err(|e| AppError::from_store(e, "bank", BANK_UNIQUE))?;

        tracing::info!("🏦 Banco {} - {} cadastrado", bank.code, bank.name);
        Ok(bank)
    }

    pub async fn list(&self) -> Result<Vec<Bank>, AppError> {
        Ok(self.repo.list(&Query::all().order_by("code", Direction::Asc)).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Bank, AppError> {
        self.repo
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "bank", &[]))
    }

    /// O código é a chave natural e não muda; só o nome é gravado.
    pub async fn update(&self, id: Uuid, payload: UpdateBankPayload) -> Result<Bank, AppError> {
        let patch = BankNamePatch {
            name: payload.name.trim().to_string(),
            updated_at: Utc::now(),
        };
        self.repo
            .update(id, &patch)
            .await
            .map_err(|e| AppError::from_store(e, "bank", &[]))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo
            .remove(id)
            .await
            .map_err(|e| AppError::from_store(e, "bank", &[]))
    }
}
