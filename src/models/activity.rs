// src/models/activity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{form::blank_as_none, listing::Searchable};

// Ramo de atuação de uma agência (tabela de apoio)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[schema(example = "Turismo corporativo")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Activity {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_deref().unwrap_or_default()]
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Turismo corporativo")]
    pub name: String,

    #[serde(deserialize_with = "blank_as_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub name: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ActivityPayload> for ActivityRecord {
    fn from(payload: ActivityPayload) -> Self {
        Self {
            name: payload.name.trim().to_string(),
            description: payload.description,
            updated_at: Utc::now(),
        }
    }
}
