// src/services/activity_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DataClient, Direction, Query, Repository, Table},
    models::activity::{Activity, ActivityPayload, ActivityRecord},
};

#[derive(Clone)]
pub struct ActivityService {
    repo: Repository<Activity>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self { repo: Repository::new(store, Table::Activities) }
    }

    pub async fn create(&self, payload: ActivityPayload) -> Result<Activity, AppError> {
        let record = ActivityRecord::from(payload);
        Ok(self.repo.create(&record).await?)
    }

    pub async fn list(&self) -> Result<Vec<Activity>, AppError> {
        Ok(self.repo.list(&Query::all().order_by("name", Direction::Asc)).await?)
    }

    pub async fn update(&self, id: Uuid, payload: ActivityPayload) -> Result<Activity, AppError> {
        let record = ActivityRecord::from(payload);
        self.repo
            .update(id, &record)
            .await
            .map_err(|e| AppError::from_store(e, "activity", &[]))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo
            .remove(id)
            .await
            .map_err(|e| AppError::from_store(e, "activity", &[]))
    }
}
