// src/common/form.rs

// Deserializadores tolerantes para campos de formulário:
// texto opcional em branco vira `None` (vai como null para o banco) e número
// vazio ou ilegível vira zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.to_string().parse().unwrap_or_default(),
        // Aceita "10,50" como 10.50
        Value::String(s) => s.trim().replace(',', ".").parse().unwrap_or_default(),
        _ => Decimal::ZERO,
    })
}

pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}
