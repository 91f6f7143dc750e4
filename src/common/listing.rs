// src/common/listing.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ---
// Listagens
// ---
// Toda listagem busca as linhas inteiras, filtra em memória por substring
// (sem diferenciar maiúsculas) nos campos exibidos e pagina por fatiamento.

/// Campos exibidos de uma linha, usados na busca.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Parâmetros de query das rotas de listagem.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Texto procurado nos campos exibidos
    pub search: Option<String>,
    /// Página (começa em 1)
    pub page: Option<usize>,
    /// Itens por página
    pub per_page: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[schema(example = 42)]
    pub total: usize,
    #[schema(example = 1)]
    pub page: usize,
    #[schema(example = 10)]
    pub per_page: usize,
    #[schema(example = 5)]
    pub total_pages: usize,
}

/// Estado de uma tela de listagem: linhas, termo de busca e página atual.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    rows: Vec<T>,
    search: String,
    page: usize,
    per_page: usize,
}

impl<T: Searchable> ListView<T> {
    pub fn new(rows: Vec<T>, per_page: usize) -> Self {
        Self {
            rows,
            search: String::new(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Monta a visão a partir dos parâmetros da rota.
    pub fn from_params(rows: Vec<T>, params: &ListParams, default_per_page: usize, max_per_page: usize) -> Self {
        let per_page = params
            .per_page
            .unwrap_or(default_per_page)
            .clamp(1, max_per_page.max(1));

        let mut view = Self::new(rows, per_page);
        if let Some(term) = params.search.as_deref() {
            view.set_search(term);
        }
        view.set_page(params.page.unwrap_or(1));
        view
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Trocar o termo de busca sempre volta para a página 1.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_string();
        self.page = 1;
    }

    /// Vai para a página pedida, limitada ao intervalo existente.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn filtered(&self) -> Vec<&T> {
        let needle = self.search.to_lowercase();
        self.rows.iter().filter(|row| row.matches(&needle)).collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.per_page).max(1)
    }

    pub fn current_page(&self) -> Vec<&T> {
        self.filtered()
            .into_iter()
            .skip((self.page - 1) * self.per_page)
            .take(self.per_page)
            .collect()
    }

    pub fn into_page(self) -> Paginated<T> {
        let needle = self.search.to_lowercase();
        let filtered: Vec<T> = self.rows.into_iter().filter(|row| row.matches(&needle)).collect();

        let total = filtered.len();
        let total_pages = total.div_ceil(self.per_page).max(1);
        let items = filtered
            .into_iter()
            .skip((self.page - 1) * self.per_page)
            .take(self.per_page)
            .collect();

        Paginated {
            items,
            total,
            page: self.page,
            per_page: self.per_page,
            total_pages,
        }
    }
}
