// src/db.rs

pub mod postgres;
pub use postgres::PgDataClient;
pub mod memory;
pub use memory::MemoryDataClient;
pub mod repository;
pub use repository::Repository;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

// ---
// Tabelas conhecidas
// ---
// Só estas tabelas podem ser tocadas pelo cliente de dados. O nome nunca vem
// do usuário, então pode ir direto para o SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Agencies,
    AgencyProfiles,
    Activities,
    Identities,
    Clients,
    Banks,
    Companies,
    GatewaySettings,
    SiteTexts,
    Slides,
    Orders,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::Agencies,
        Table::AgencyProfiles,
        Table::Activities,
        Table::Identities,
        Table::Clients,
        Table::Banks,
        Table::Companies,
        Table::GatewaySettings,
        Table::SiteTexts,
        Table::Slides,
        Table::Orders,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Agencies => "agencies",
            Table::AgencyProfiles => "agency_profiles",
            Table::Activities => "activities",
            Table::Identities => "identities",
            Table::Clients => "clients",
            Table::Banks => "banks",
            Table::Companies => "companies",
            Table::GatewaySettings => "gateway_settings",
            Table::SiteTexts => "site_texts",
            Table::Slides => "slides",
            Table::Orders => "orders",
        }
    }

    /// Coluna da chave primária.
    pub fn key_column(&self) -> &'static str {
        match self {
            Table::GatewaySettings | Table::SiteTexts => "key",
            _ => "id",
        }
    }

    /// Colunas com restrição UNIQUE (além da chave primária).
    pub fn unique_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Agencies => &["cnpj"],
            Table::Identities => &["email"],
            Table::Clients => &["identity_id"],
            Table::Banks => &["code"],
            _ => &[],
        }
    }

    pub fn has_created_at(&self) -> bool {
        !matches!(self, Table::GatewaySettings | Table::SiteTexts)
    }

    pub fn has_updated_at(&self) -> bool {
        !matches!(self, Table::Identities)
    }

    /// Traduz o nome de uma constraint do Postgres para a coluna afetada.
    /// Segue a convenção `{tabela}_{coluna}_key` / `{tabela}_pkey`.
    pub fn column_for_constraint(&self, constraint: &str) -> Option<String> {
        let rest = constraint.strip_prefix(self.name())?.strip_prefix('_')?;
        if rest == "pkey" {
            return Some(self.key_column().to_string());
        }
        rest.strip_suffix("_key").map(str::to_string)
    }
}

// ---
// Consultas
// ---

/// Igualdade simples `coluna = valor`. Vários filtros são combinados com AND.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self { column: column.to_string(), value: value.into() }
    }

    pub fn id(id: Uuid) -> Self {
        Self::eq("id", id.to_string())
    }
}

/// Um `update` descrito por inteiro, para operações que gravam em par.
#[derive(Debug, Clone)]
pub struct Update {
    pub table: Table,
    pub patch: Value,
    pub filters: Vec<Filter>,
}

impl Update {
    pub fn new(table: Table, patch: Value, filters: Vec<Filter>) -> Self {
        Self { table, patch, filters }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order_by = Some((column.to_string(), direction));
        self
    }
}

// ---
// Erros do cliente de dados
// ---
// Conjunto fechado: quem chama decide o que fazer casando o tipo, nunca o texto.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("valor duplicado em {table} (coluna {column:?})")]
    UniqueViolation {
        table: &'static str,
        column: Option<String>,
    },

    #[error("violação de chave estrangeira em {table}")]
    ForeignKeyViolation { table: &'static str },

    #[error("registro não encontrado")]
    NotFound,

    #[error("identificador inválido: {0}")]
    InvalidIdentifier(String),

    #[error("banco de dados indisponível: {0}")]
    Unavailable(String),

    #[error("erro de banco de dados: {0}")]
    Database(String),

    #[error("linha em formato inesperado: {0}")]
    Decode(#[from] serde_json::Error),
}

// ---
// O cliente de dados
// ---
// Um único ponto de acesso ao banco relacional. As linhas trafegam como objetos
// JSON com as colunas em snake_case.
#[async_trait]
pub trait DataClient: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError>;

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    async fn update(
        &self,
        table: Table,
        patch: Value,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError>;

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError>;

    async fn upsert(&self, table: Table, row: Value, conflict: &str) -> Result<Value, StoreError>;

    /// Grava todas as linhas ou nenhuma.
    async fn upsert_many(
        &self,
        table: Table,
        rows: Vec<Value>,
        conflict: &str,
    ) -> Result<Vec<Value>, StoreError>;

    /// Insere o pai, copia o `id` dele para `child_row[link_column]` e insere o
    /// filho, na mesma transação.
    async fn insert_linked(
        &self,
        parent: Table,
        parent_row: Value,
        child: Table,
        child_row: Value,
        link_column: &str,
    ) -> Result<(Value, Value), StoreError>;

    /// Aplica os dois updates na mesma transação e devolve as linhas do
    /// segundo. Se algum deles não encontrar linha, nada é gravado (`NotFound`).
    async fn update_pair(&self, first: Update, second: Update) -> Result<Vec<Value>, StoreError>;

    /// Troca o valor de `column` entre duas linhas, na mesma transação.
    async fn swap(&self, table: Table, column: &str, a: Uuid, b: Uuid) -> Result<(), StoreError>;
}

/// Nome de coluna aceitável para ir ao SQL como identificador.
pub fn check_identifier(name: &str) -> Result<&str, StoreError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_lowercase() || c == '_')
        .unwrap_or(false);
    if valid_start && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        Ok(name)
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_names_map_to_columns() {
        assert_eq!(Table::Banks.column_for_constraint("banks_code_key").as_deref(), Some("code"));
        assert_eq!(
            Table::Clients.column_for_constraint("clients_identity_id_key").as_deref(),
            Some("identity_id")
        );
        assert_eq!(Table::SiteTexts.column_for_constraint("site_texts_pkey").as_deref(), Some("key"));
        assert_eq!(Table::Banks.column_for_constraint("agencies_cnpj_key"), None);
    }

    #[test]
    fn identifiers_are_checked() {
        assert!(check_identifier("mileage_tiers").is_ok());
        assert!(check_identifier("_x1").is_ok());
        assert!(check_identifier("1abc").is_err());
        assert!(check_identifier("name; drop table banks").is_err());
        assert!(check_identifier("Name").is_err());
        assert!(check_identifier("").is_err());
    }
}
