// src/models/content.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{form::blank_as_none, listing::Searchable, validation::validate_text_key};

// --- TEXTOS E POLÍTICAS ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteText {
    #[schema(example = "privacy_policy")]
    pub key: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for SiteText {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.key.as_str(), self.content.as_str()]
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveTextPayload {
    #[validate(custom(function = "validate_text_key"))]
    #[schema(example = "privacy_policy")]
    pub key: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Esta política descreve...")]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteTextRecord {
    pub key: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

// --- SLIDES DA HOME ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: Uuid,
    #[schema(example = "https://cdn.exemplo.com/slides/verao.jpg")]
    pub image_url: String,
    pub caption: Option<String>,
    pub active: bool,
    /// Ordem de exibição; criar ou remover recompacta para 1..n
    #[schema(example = 1)]
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Searchable for Slide {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.image_url.as_str(), self.caption.as_deref().unwrap_or_default()]
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SlidePayload {
    #[validate(url(message = "invalid_url"))]
    #[schema(example = "https://cdn.exemplo.com/slides/verao.jpg")]
    pub image_url: String,

    #[serde(deserialize_with = "blank_as_none")]
    #[schema(example = "Promoção de verão")]
    pub caption: Option<String>,

    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSlide {
    pub image_url: String,
    pub caption: Option<String>,
    pub active: bool,
    pub position: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlidePatch {
    pub image_url: String,
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveSlidePayload {
    pub direction: MoveDirection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slide_needs_a_real_url() {
        let bad: SlidePayload = serde_json::from_value(json!({ "imageUrl": "verao.jpg" })).unwrap();
        assert!(bad.validate().is_err());

        let ok: SlidePayload =
            serde_json::from_value(json!({ "imageUrl": "https://cdn.exemplo.com/a.jpg", "caption": "" }))
                .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.caption, None);
    }

    #[test]
    fn text_keys_are_snake_case() {
        let bad: SaveTextPayload =
            serde_json::from_value(json!({ "key": "Política", "content": "x" })).unwrap();
        assert!(bad.validate().unwrap_err().field_errors().contains_key("key"));
    }
}
