// src/models/mileage.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationError;

use crate::common::{error::AppError, form::lenient_decimal, validation::coded};

// ---
// Tabela de milhas de uma companhia aérea
// ---
// Faixas contínuas e ordenadas: cada `min` é o `max` anterior + 1 e só a última
// faixa fica sem limite superior (`max = null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MileageTier {
    #[schema(example = 1)]
    pub min: i64,

    #[schema(example = 10000)]
    pub max: Option<i64>,

    /// Preço por milheiro
    #[serde(default, deserialize_with = "lenient_decimal")]
    #[schema(value_type = f64, example = 17.5)]
    pub price: Decimal,
}

pub fn validate_tiers(tiers: &[MileageTier]) -> Result<(), ValidationError> {
    let Some((last, rest)) = tiers.split_last() else {
        return Err(coded("tiers_required"));
    };

    for tier in tiers {
        if tier.price.is_sign_negative() && !tier.price.is_zero() {
            return Err(coded("negative_value"));
        }
        if let Some(max) = tier.max {
            if tier.min > max {
                return Err(coded("tier_bounds"));
            }
        }
    }

    if last.max.is_some() || rest.iter().any(|t| t.max.is_none()) {
        return Err(coded("last_tier_unbounded"));
    }

    let contiguous = tiers
        .windows(2)
        .all(|pair| pair[0].max.and_then(|max| max.checked_add(1)) == Some(pair[1].min));
    if !contiguous {
        return Err(coded("tiers_not_contiguous"));
    }

    Ok(())
}

fn rule(code: &'static str) -> AppError {
    AppError::RuleViolation { field: "mileageTiers", code }
}

/// Abre uma nova faixa a partir de `min`. A faixa que era a última passa a
/// terminar em `min - 1`.
pub fn add_tier(tiers: &mut Vec<MileageTier>, min: i64, price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(rule("negative_value"));
    }

    if let Some(last) = tiers.last_mut() {
        if min <= last.min {
            return Err(rule("tier_start_too_low"));
        }
        last.max = Some(min - 1);
    }

    tiers.push(MileageTier { min, max: None, price });
    Ok(())
}

/// Remove a faixa da posição pedida; a vizinha absorve o intervalo dela.
pub fn remove_tier(tiers: &mut Vec<MileageTier>, index: usize) -> Result<MileageTier, AppError> {
    if index >= tiers.len() {
        return Err(rule("index_out_of_range"));
    }
    if tiers.len() == 1 {
        return Err(rule("last_tier"));
    }

    let removed = tiers.remove(index);
    match tiers.get_mut(index) {
        // a seguinte passa a começar onde a removida começava
        Some(next) => next.min = removed.min,
        // era a última: a anterior vira a faixa sem limite
        None => {
            if let Some(prev) = tiers.last_mut() {
                prev.max = None;
            }
        }
    }
    Ok(removed)
}
