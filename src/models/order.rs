// src/models/order.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use validator::Validate;

use crate::common::{
    form::lenient_decimal,
    listing::Searchable,
    validation::validate_non_negative,
};

// --- STATUS DA OP ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    PendingPayment,
    InService,
    Finalized,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::InService => "in_service",
            OrderStatus::Finalized => "finalized",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Finalized | OrderStatus::Cancelled)
    }

    // open -> pending_payment -> in_service -> finalized
    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Open => Some(OrderStatus::PendingPayment),
            OrderStatus::PendingPayment => Some(OrderStatus::InService),
            OrderStatus::InService => Some(OrderStatus::Finalized),
            OrderStatus::Finalized | OrderStatus::Cancelled => None,
        }
    }

    /// Avança um passo no fluxo ou cancela, desde que a OP não esteja encerrada.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- ORDEM DE PEDIDO ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(example = 1042)]
    pub number: i64,
    #[schema(example = "Viagens Exemplo")]
    pub requester: String,
    pub agency_id: Option<Uuid>,
    #[schema(value_type = f64, example = 1890.5)]
    pub amount: Decimal,
    #[schema(example = "pix")]
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Cópia do número em texto para a busca
    #[serde(skip)]
    pub number_text: String,
}

impl Order {
    pub fn with_search_text(mut self) -> Self {
        self.number_text = self.number.to_string();
        self
    }
}

impl Searchable for Order {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.number_text.as_str(),
            self.requester.as_str(),
            self.payment_method.as_str(),
        ]
    }
}

// Lançamento manual de uma OP; nasce sempre em `open`
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Viagens Exemplo")]
    pub requester: String,

    pub agency_id: Option<Uuid>,

    #[serde(deserialize_with = "lenient_decimal")]
    #[validate(custom(function = "validate_non_negative"))]
    #[schema(value_type = f64, example = 1890.5)]
    pub amount: Decimal,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "pix")]
    pub payment_method: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub requester: String,
    pub agency_id: Option<Uuid>,
    pub amount: Decimal,
    pub payment_method: String,
    pub status: OrderStatus,
}

impl From<CreateOrderPayload> for NewOrder {
    fn from(payload: CreateOrderPayload) -> Self {
        Self {
            requester: payload.requester.trim().to_string(),
            agency_id: payload.agency_id,
            amount: payload.amount,
            payment_method: payload.payment_method.trim().to_string(),
            status: OrderStatus::Open,
        }
    }
}

/// Aba de status na listagem de OPs.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    pub status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}

impl StatusPatch {
    pub fn new(status: OrderStatus) -> Self {
        Self { status, updated_at: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn workflow_moves_one_step_at_a_time() {
        assert!(Open.can_transition_to(PendingPayment));
        assert!(PendingPayment.can_transition_to(InService));
        assert!(InService.can_transition_to(Finalized));

        assert!(!Open.can_transition_to(InService));
        assert!(!Open.can_transition_to(Finalized));
        assert!(!InService.can_transition_to(PendingPayment));
        assert!(!Open.can_transition_to(Open));
    }

    #[test]
    fn cancel_from_any_open_state_only() {
        for status in [Open, PendingPayment, InService] {
            assert!(status.can_transition_to(Cancelled));
        }
        assert!(!Finalized.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Open));
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_value(PendingPayment).unwrap(), "pending_payment");
        assert_eq!(InService.to_string(), "in_service");
    }
}
