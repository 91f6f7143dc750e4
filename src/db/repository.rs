// src/db/repository.rs

use std::{marker::PhantomData, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{DataClient, Filter, Query, StoreError, Table};

// Repositório tipado sobre o cliente de dados.
// Cada serviço guarda um por tabela e trabalha só com structs. Os modelos usam
// camelCase (o formato da API) e as colunas usam snake_case; a conversão é feita
// aqui, só no primeiro nível (colunas jsonb ficam como estão).
pub struct Repository<T> {
    store: Arc<dyn DataClient>,
    table: Table,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            table: self.table,
            _row: PhantomData,
        }
    }
}

fn rename_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(obj) => Value::Object(obj.into_iter().map(|(k, v)| (rename(&k), v)).collect()),
        other => other,
    }
}

pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' && !out.is_empty() {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

pub fn to_row<R: Serialize>(record: &R) -> Result<Value, StoreError> {
    Ok(rename_keys(serde_json::to_value(record)?, snake_case))
}

pub fn from_row<T: DeserializeOwned>(row: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(rename_keys(row, camel_case))?)
}

impl<T: DeserializeOwned> Repository<T> {
    pub fn new(store: Arc<dyn DataClient>, table: Table) -> Self {
        Self { store, table, _row: PhantomData }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn store(&self) -> &Arc<dyn DataClient> {
        &self.store
    }

    pub async fn list(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        self.store
            .select(self.table, query)
            .await?
            .into_iter()
            .map(from_row)
            .collect()
    }

    pub async fn find_by(&self, column: &str, value: impl Into<Value>) -> Result<Option<T>, StoreError> {
        let query = Query::all().filter(Filter::eq(column, value));
        Ok(self.list(&query).await?.into_iter().next())
    }

    /// Busca pela chave; `NotFound` se não existir.
    pub async fn find(&self, id: Uuid) -> Result<T, StoreError> {
        self.find_by(self.table.key_column(), id.to_string())
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn create<R: Serialize>(&self, record: &R) -> Result<T, StoreError> {
        let row = self.store.insert(self.table, to_row(record)?).await?;
        from_row(row)
    }

    pub async fn update<R: Serialize>(&self, id: Uuid, patch: &R) -> Result<T, StoreError> {
        let rows = self
            .store
            .update(self.table, to_row(patch)?, &[Filter::id(id)])
            .await?;

        let row = rows.into_iter().next().ok_or(StoreError::NotFound)?;
        from_row(row)
    }

    /// Atualiza só se a linha ainda casar com `expected`. `None` quando ela
    /// mudou no meio do caminho.
    pub async fn update_if<R: Serialize>(
        &self,
        id: Uuid,
        expected: Filter,
        patch: &R,
    ) -> Result<Option<T>, StoreError> {
        let rows = self
            .store
            .update(self.table, to_row(patch)?, &[Filter::id(id), expected])
            .await?;

        rows.into_iter().next().map(from_row).transpose()
    }

    pub async fn upsert<R: Serialize>(&self, record: &R, conflict: &str) -> Result<T, StoreError> {
        let row = self.store.upsert(self.table, to_row(record)?, conflict).await?;
        from_row(row)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        match self.store.delete(self.table, &[Filter::id(id)]).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }
}
