// src/services/order_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DataClient, Direction, Filter, Query, Repository, Table},
    models::order::{CreateOrderPayload, NewOrder, Order, OrderStatus, StatusPatch},
};

#[derive(Clone)]
pub struct OrderService {
    orders: Repository<Order>,
}

impl OrderService {
    pub fn new(store: Arc<dyn DataClient>) -> Self {
        Self { orders: Repository::new(store, Table::Orders) }
    }

    pub async fn create(&self, payload: CreateOrderPayload) -> Result<Order, AppError> {
        let order = self
            .orders
            .create(&NewOrder::from(payload))
            .await
            .map_err(|e| AppError::from_store(e, "order", &[]))?
            .with_search_text();
        tracing::info!("🧾 OP #{} lançada para {}", order.number, order.requester);
        Ok(order)
    }

    /// Mais recentes primeiro; `status` filtra pela aba.
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, AppError> {
        let mut query = Query::all().order_by("number", Direction::Desc);
        if let Some(status) = status {
            query = query.filter(Filter::eq("status", status.as_str()));
        }

        Ok(self
            .orders
            .list(&query)
            .await?
            .into_iter()
            .map(Order::with_search_text)
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, AppError> {
        self.orders
            .find(id)
            .await
            .map(Order::with_search_text)
            .map_err(|e| AppError::from_store(e, "order", &[]))
    }

    /// Só muda o status; nenhum lançamento financeiro acompanha a transição.
    pub async fn transition(&self, id: Uuid, target: OrderStatus) -> Result<Order, AppError> {
        let order = self.get(id).await?;
        self.transition_from(&order, target).await
    }

    // A gravação exige que o status ainda seja o lido; outra transição que
    // chegou antes faz esta falhar.
    async fn transition_from(&self, order: &Order, target: OrderStatus) -> Result<Order, AppError> {
        let rejected = || AppError::InvalidTransition {
            from: order.status.to_string(),
            to: target.to_string(),
        };
        if !order.status.can_transition_to(target) {
            return Err(rejected());
        }

        let updated = self
            .orders
            .update_if(order.id, Filter::eq("status", order.status.as_str()), &StatusPatch::new(target))
            .await
            .map_err(|e| AppError::from_store(e, "order", &[]))?
            .ok_or_else(|| {
                tracing::warn!("OP #{} mudou de status durante a transição para {}", order.number, target);
                rejected()
            })?
            .with_search_text();

        tracing::info!("OP #{}: {} -> {}", updated.number, order.status, updated.status);
        Ok(updated)
    }

    pub async fn approve_payment(&self, id: Uuid) -> Result<Order, AppError> {
        let order = self.get(id).await?;
        if order.status != OrderStatus::PendingPayment {
            return Err(AppError::InvalidTransition {
                from: order.status.to_string(),
                to: OrderStatus::InService.to_string(),
            });
        }
        self.transition_from(&order, OrderStatus::InService).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<Order, AppError> {
        self.transition(id, OrderStatus::Cancelled).await
    }
}
