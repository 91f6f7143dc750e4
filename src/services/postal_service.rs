// src/services/postal_service.rs

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::common::validation::digits_only;

/// Endereço devolvido pela consulta de CEP.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[schema(example = "01310100")]
    pub postal_code: String,
    #[schema(example = "Avenida Paulista")]
    pub street: Option<String>,
    #[schema(example = "Bela Vista")]
    pub district: Option<String>,
    #[schema(example = "São Paulo")]
    pub city: Option<String>,
    #[schema(example = "SP")]
    pub state: Option<String>,
}

// Resposta do ViaCEP
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Interpreta o corpo do ViaCEP. `{"erro": true}` significa CEP inexistente.
pub fn parse_response(postal_code: &str, body: Value) -> Option<PostalAddress> {
    let not_found = match body.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag == "true",
        _ => false,
    };
    if not_found {
        return None;
    }

    let parsed: ViaCepResponse = serde_json::from_value(body).ok()?;
    Some(PostalAddress {
        postal_code: postal_code.to_string(),
        street: non_blank(parsed.logradouro),
        district: non_blank(parsed.bairro),
        city: non_blank(parsed.localidade),
        state: non_blank(parsed.uf),
    })
}

/// Consulta de CEP para pré-preencher endereços. Melhor esforço: qualquer
/// falha vira `None` e só aparece no log.
#[derive(Clone)]
pub struct PostalService {
    client: Client,
    base_url: String,
}

impl PostalService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, cep: &str) -> Option<PostalAddress> {
        let postal_code = digits_only(cep);
        if postal_code.len() != 8 {
            tracing::warn!("CEP inválido na consulta: {}", cep);
            return None;
        }

        let url = format!("{}/{}/json/", self.base_url, postal_code);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Falha ao consultar o CEP {}: {}", postal_code, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("Consulta do CEP {} respondeu {}", postal_code, response.status());
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => {
                let address = parse_response(&postal_code, body);
                if address.is_none() {
                    tracing::warn!("CEP {} não encontrado", postal_code);
                }
                address
            }
            Err(e) => {
                tracing::warn!("Resposta ilegível para o CEP {}: {}", postal_code, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_found_address() {
        let body = json!({
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        });
        let address = parse_response("01310100", body).unwrap();
        assert_eq!(address.city.as_deref(), Some("São Paulo"));
        assert_eq!(address.state.as_deref(), Some("SP"));
    }

    #[test]
    fn error_flag_means_no_address() {
        assert!(parse_response("99999999", json!({ "erro": true })).is_none());
        assert!(parse_response("99999999", json!({ "erro": "true" })).is_none());
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let service = PostalService::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(service.lookup("123").await.is_none());
        assert!(service.lookup("01310-100").await.is_none());
    }
}
