// src/services/content_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{repository::to_row, DataClient, Direction, Query, Repository, Table},
    models::{
        agency::ActiveFlag,
        content::{
            MoveDirection, NewSlide, SaveTextPayload, SiteText, SiteTextRecord, Slide, SlidePatch,
            SlidePayload,
        },
    },
};

/// Vizinho de `id` na ordem de exibição, se houver.
pub fn neighbour(slides: &[Slide], id: Uuid, direction: MoveDirection) -> Option<Option<Uuid>> {
    let index = slides.iter().position(|s| s.id == id)?;
    let other = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|i| *i < slides.len()),
    };
    Some(other.map(|i| slides[i].id))
}

/// Só as linhas cuja posição difere de `índice + 1`, já corrigidas.
pub fn renumbered(slides: Vec<Slide>) -> Vec<Slide> {
    slides
        .into_iter()
        .zip(1..)
        .filter(|(slide, position)| slide.position != *position)
        .map(|(slide, position)| Slide { position, ..slide })
        .collect()
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn DataClient>,
    texts: Repository<SiteText>,
    slides: Repository<Slide>,
}

impl ContentService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self {
            texts: Repository::new(store.clone(), Table::SiteTexts),
            slides: Repository::new(store.clone(), Table::Slides),
            store,
        }
    }

    // =========================================================================
    //  TEXTOS / POLÍTICAS
    // =========================================================================

    pub async fn list_texts(&self) -> Result<Vec<SiteText>, AppError> {
        Ok(self.texts.list(&Query::all().order_by("key", Direction::Asc)).await?)
    }

    pub async fn get_text(&self, key: &str) -> Result<SiteText, AppError> {
        self.texts
            .find_by("key", key)
            .await?
            .ok_or(AppError::NotFound("text"))
    }

    /// Cria ou substitui o texto da chave.
    pub async fn save_text(&self, payload: SaveTextPayload) -> Result<SiteText, AppError> {
        let record = SiteTextRecord {
            key: payload.key,
            content: payload.content,
            updated_at: Utc::now(),
        };
        let text = self.texts.upsert(&record, "key").await?;
        tracing::info!("📝 Texto '{}' salvo", text.key);
        Ok(text)
    }

    // =========================================================================
    //  SLIDES
    // =========================================================================

    async fn ordered_slides(&self) -> Result<Vec<Slide>, AppError> {
        Ok(self.slides.list(&Query::all().order_by("position", Direction::Asc)).await?)
    }

    pub async fn list_slides(&self) -> Result<Vec<Slide>, AppError> {
        self.ordered_slides().await
    }

    pub async fn get_slide(&self, id: Uuid) -> Result<Slide, AppError> {
        self.slides
            .find(id)
            .await
            .map_err(|e| AppError::from_store(e, "slide", &[]))
    }

    /// Novo slide entra no fim da fila.
    pub async fn create_slide(&self, payload: SlidePayload) -> Result<Slide, AppError> {
        let last = self
            .ordered_slides()
            .await?
            .iter()
            .map(|s| s.position)
            .max()
            .unwrap_or(0);

        let record = NewSlide {
            image_url: payload.image_url.trim().to_string(),
            caption: payload.caption,
            active: payload.active.unwrap_or(true),
            position: last + 1,
        };
        let created = self.slides.create(&record).await?;
        self.compact_positions().await?;
        self.get_slide(created.id).await
    }

    pub async fn update_slide(&self, id: Uuid, payload: SlidePayload) -> Result<Slide, AppError> {
        let patch = SlidePatch {
            image_url: payload.image_url.trim().to_string(),
            caption: payload.caption,
            active: payload.active,
            updated_at: Utc::now(),
        };
        self.slides
            .update(id, &patch)
            .await
            .map_err(|e| AppError::from_store(e, "slide", &[]))
    }

    pub async fn toggle_slide(&self, id: Uuid) -> Result<Slide, AppError> {
        let slide = self.get_slide(id).await?;
        let flag = ActiveFlag { active: !slide.active, updated_at: Utc::now() };
        Ok(self.slides.update(id, &flag).await?)
    }

    /// Troca a posição com o vizinho; nas pontas não faz nada.
    pub async fn move_slide(&self, id: Uuid, direction: MoveDirection) -> Result<Vec<Slide>, AppError> {
        let slides = self.ordered_slides().await?;
        let other = neighbour(&slides, id, direction).ok_or(AppError::NotFound("slide"))?;

        match other {
            Some(other) => {
                self.store.swap(Table::Slides, "position", id, other).await?;
                tracing::info!("Slide {} movido ({:?})", id, direction);
                self.ordered_slides().await
            }
            None => Ok(slides),
        }
    }

    /// Remove o slide e fecha o buraco na sequência.
    pub async fn delete_slide(&self, id: Uuid) -> Result<(), AppError> {
        self.slides
            .remove(id)
            .await
            .map_err(|e| AppError::from_store(e, "slide", &[]))?;
        self.compact_positions().await
    }

    // Regrava 1..n na ordem atual, numa transação só. Também desfaz empates
    // deixados por criações simultâneas.
    async fn compact_positions(&self) -> Result<(), AppError> {
        let rows = renumbered(self.ordered_slides().await?)
            .iter()
            .map(to_row)
            .collect::<Result<Vec<_>, _>>()?;
        if rows.is_empty() {
            return Ok(());
        }

        self.store.upsert_many(Table::Slides, rows, "id").await?;
        tracing::debug!("Posições dos slides recompactadas");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDataClient;

    fn slide(url: &str) -> SlidePayload {
        SlidePayload { image_url: url.into(), caption: None, active: None }
    }

    #[tokio::test]
    async fn slides_are_appended_and_swapped() {
        let store = Arc::new(MemoryDataClient::new());
        let service = ContentService::new(store.clone());

        let a = service.create_slide(slide("https://cdn.ex.com/a.jpg")).await.unwrap();
        let b = service.create_slide(slide("https://cdn.ex.com/b.jpg")).await.unwrap();
        assert_eq!((a.position, b.position), (1, 2));
        assert!(a.active);

        let order = service.move_slide(b.id, MoveDirection::Up).await.unwrap();
        assert_eq!(order[0].id, b.id);
        assert_eq!(order[1].id, a.id);

        // na ponta: nada muda e nenhuma escrita acontece
        let calls = store.calls();
        let order = service.move_slide(b.id, MoveDirection::Up).await.unwrap();
        assert_eq!(order[0].id, b.id);
        assert_eq!(store.calls(), calls + 1);

        assert!(service.move_slide(Uuid::new_v4(), MoveDirection::Down).await.is_err());
    }

    #[tokio::test]
    async fn deleting_closes_the_gap() {
        let service = ContentService::new(Arc::new(MemoryDataClient::new()));
        let a = service.create_slide(slide("https://cdn.ex.com/a.jpg")).await.unwrap();
        let b = service.create_slide(slide("https://cdn.ex.com/b.jpg")).await.unwrap();
        let c = service.create_slide(slide("https://cdn.ex.com/c.jpg")).await.unwrap();

        service.delete_slide(b.id).await.unwrap();

        let slides = service.list_slides().await.unwrap();
        let order: Vec<_> = slides.iter().map(|s| (s.id, s.position)).collect();
        assert_eq!(order, vec![(a.id, 1), (c.id, 2)]);

        let d = service.create_slide(slide("https://cdn.ex.com/d.jpg")).await.unwrap();
        assert_eq!(d.position, 3);
        assert!(matches!(service.delete_slide(b.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn tied_positions_are_spread_out() {
        let store = Arc::new(MemoryDataClient::new());
        let service = ContentService::new(store.clone());
        service.create_slide(slide("https://cdn.ex.com/a.jpg")).await.unwrap();
        // duas criações simultâneas leram o mesmo máximo
        store
            .insert(
                Table::Slides,
                to_row(&NewSlide {
                    image_url: "https://cdn.ex.com/b.jpg".into(),
                    caption: None,
                    active: true,
                    position: 1,
                })
                .unwrap(),
            )
            .await
            .unwrap();

        let c = service.create_slide(slide("https://cdn.ex.com/c.jpg")).await.unwrap();

        let mut positions: Vec<_> =
            service.list_slides().await.unwrap().iter().map(|s| s.position).collect();
        positions.sort();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(c.position, 3);
    }

    #[test]
    fn renumbering_touches_only_misplaced_rows() {
        let now = Utc::now();
        let make = |position| Slide {
            id: Uuid::new_v4(),
            image_url: "https://cdn.ex.com/x.jpg".into(),
            caption: None,
            active: true,
            position,
            created_at: now,
            updated_at: now,
        };
        let fixed = renumbered(vec![make(1), make(3), make(7)]);
        let positions: Vec<_> = fixed.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![2, 3]);
    }

    #[tokio::test]
    async fn toggling_flips_the_flag() {
        let service = ContentService::new(Arc::new(MemoryDataClient::new()));
        let s = service.create_slide(slide("https://cdn.ex.com/a.jpg")).await.unwrap();
        assert!(!service.toggle_slide(s.id).await.unwrap().active);
    }

    #[tokio::test]
    async fn texts_are_upserted_by_key() {
        let service = ContentService::new(Arc::new(MemoryDataClient::new()));
        let save = |content: &str| SaveTextPayload { key: "privacy_policy".into(), content: content.into() };

        service.save_text(save("v1")).await.unwrap();
        service.save_text(save("v2")).await.unwrap();

        let texts = service.list_texts().await.unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(service.get_text("privacy_policy").await.unwrap().content, "v2");
        assert!(matches!(service.get_text("terms").await, Err(AppError::NotFound(_))));
    }
}
