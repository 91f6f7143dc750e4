// src/models/navigation.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

// Telas do back-office. Substitui o "item de menu ativo" em texto livre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    Dashboard,
    Agencies,
    AgencyProfiles,
    Users,
    Activities,
    Banks,
    Companies,
    Gateways,
    Texts,
    Slides,
    Orders,
    FlightResults,
}

/// Tela com os parâmetros que ela exige.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    Agencies,
    AgencyProfiles,
    Users,
    Activities,
    Banks,
    Companies,
    Gateways,
    Texts,
    Slides,
    Orders,
    FlightResults {
        #[serde(rename = "searchId")]
        search_id: String,
    },
}

impl Page {
    pub fn resolve(key: PageKey, search_id: Option<&str>) -> Result<Self, AppError> {
        Ok(match key {
            PageKey::Dashboard => Page::Dashboard,
            PageKey::Agencies => Page::Agencies,
            PageKey::AgencyProfiles => Page::AgencyProfiles,
            PageKey::Users => Page::Users,
            PageKey::Activities => Page::Activities,
            PageKey::Banks => Page::Banks,
            PageKey::Companies => Page::Companies,
            PageKey::Gateways => Page::Gateways,
            PageKey::Texts => Page::Texts,
            PageKey::Slides => Page::Slides,
            PageKey::Orders => Page::Orders,
            PageKey::FlightResults => {
                let search_id = search_id
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(AppError::RuleViolation {
                        field: "searchId",
                        code: "search_id_required",
                    })?;
                Page::FlightResults { search_id: search_id.to_string() }
            }
        })
    }

    pub fn route(&self) -> String {
        match self {
            Page::Dashboard => "/dashboard".into(),
            Page::Agencies => "/agencies".into(),
            Page::AgencyProfiles => "/agency-profiles".into(),
            Page::Users => "/users".into(),
            Page::Activities => "/activities".into(),
            Page::Banks => "/banks".into(),
            Page::Companies => "/companies".into(),
            Page::Gateways => "/gateways".into(),
            Page::Texts => "/texts".into(),
            Page::Slides => "/slides".into(),
            Page::Orders => "/orders".into(),
            Page::FlightResults { search_id } => format!("/flights/results/{search_id}"),
        }
    }
}

// Itens da barra lateral, na ordem do menu
const MENU: &[(PageKey, &str)] = &[
    (PageKey::Dashboard, "Painel"),
    (PageKey::Agencies, "Agências"),
    (PageKey::AgencyProfiles, "Perfis de agência"),
    (PageKey::Users, "Usuários"),
    (PageKey::Activities, "Atividades"),
    (PageKey::Banks, "Bancos"),
    (PageKey::Companies, "Companhias aéreas"),
    (PageKey::Gateways, "Gateways de pagamento"),
    (PageKey::Texts, "Textos e políticas"),
    (PageKey::Slides, "Slides"),
    (PageKey::Orders, "Ordens de pedido"),
];

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuEntry {
    pub key: PageKey,
    #[schema(example = "Bancos")]
    pub label: String,
    #[schema(example = "/banks")]
    pub route: String,
}

pub fn menu() -> Vec<MenuEntry> {
    MENU.iter()
        .filter_map(|(key, label)| {
            // telas com parâmetro obrigatório não entram no menu
            Page::resolve(*key, None).ok().map(|page| MenuEntry {
                key: *key,
                label: label.to_string(),
                route: page.route(),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigatePayload {
    pub page: PageKey,
    #[schema(example = "b7c1e2")]
    pub search_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedPage {
    #[serde(flatten)]
    pub page: Page,
    #[schema(example = "/flights/results/b7c1e2")]
    pub route: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flight_results_needs_a_search_id() {
        assert!(Page::resolve(PageKey::FlightResults, None).is_err());
        assert!(Page::resolve(PageKey::FlightResults, Some("  ")).is_err());

        let page = Page::resolve(PageKey::FlightResults, Some("abc")).unwrap();
        assert_eq!(page.route(), "/flights/results/abc");
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            json!({ "page": "flight_results", "searchId": "abc" })
        );
    }

    #[test]
    fn menu_lists_every_plain_page_in_order() {
        let entries = menu();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0].key, PageKey::Dashboard);
        assert_eq!(entries[5].route, "/banks");
        assert!(entries.iter().all(|e| e.key != PageKey::FlightResults));
    }
}
