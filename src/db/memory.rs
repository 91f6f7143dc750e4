// src/db/memory.rs

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{check_identifier, DataClient, Direction, Filter, Query, StoreError, Table, Update};

// Backend em memória com o mesmo contrato do Postgres.
// Usado pelo modo `STORE_BACKEND=memory` e pela suíte de testes.
#[derive(Default)]
pub struct MemoryDataClient {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    calls: AtomicUsize,
}

impl MemoryDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantas chamadas o cliente de dados já recebeu.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Cópia das linhas de uma tabela, na ordem de inserção.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.lock().get(&table).cloned().unwrap_or_default()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
    }
}

fn as_object(row: Value) -> Result<Map<String, Value>, StoreError> {
    match row {
        Value::Object(obj) => {
            for key in obj.keys() {
                check_identifier(key)?;
            }
            Ok(obj)
        }
        _ => Err(StoreError::Database("a linha precisa ser um objeto JSON".into())),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| row.get(&f.column).unwrap_or(&Value::Null) == &f.value)
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .partial_cmp(&y.as_f64().unwrap_or_default())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// Checa as colunas únicas (e a chave) da linha contra as demais.
fn check_unique(table: Table, rows: &[Value], row: &Value, skip: Option<usize>) -> Result<(), StoreError> {
    let key = table.key_column();
    let columns = std::iter::once(key).chain(table.unique_columns().iter().copied());

    for column in columns {
        let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
            continue;
        };
        let taken = rows
            .iter()
            .enumerate()
            .any(|(i, other)| Some(i) != skip && other.get(column) == Some(value));
        if taken {
            return Err(StoreError::UniqueViolation {
                table: table.name(),
                column: Some(column.to_string()),
            });
        }
    }
    Ok(())
}

// Preenche o que o banco preencheria sozinho (DEFAULTs)
fn fill_defaults(table: Table, rows: &[Value], obj: &mut Map<String, Value>) {
    let now = Value::String(Utc::now().to_rfc3339());

    if table.key_column() == "id" && obj.get("id").map_or(true, Value::is_null) {
        obj.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    }
    if table.has_created_at() && !obj.contains_key("created_at") {
        obj.insert("created_at".into(), now.clone());
    }
    if table.has_updated_at() && !obj.contains_key("updated_at") {
        obj.insert("updated_at".into(), now);
    }
    if table == Table::Orders && obj.get("number").map_or(true, Value::is_null) {
        let next = rows
            .iter()
            .filter_map(|r| r.get("number").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        obj.insert("number".into(), Value::from(next));
    }
    if table == Table::Orders && !obj.contains_key("status") {
        obj.insert("status".into(), Value::String("open".into()));
    }
}

fn insert_into(tables: &mut HashMap<Table, Vec<Value>>, table: Table, row: Value) -> Result<Value, StoreError> {
    let rows = tables.entry(table).or_default();
    let mut obj = as_object(row)?;
    fill_defaults(table, rows, &mut obj);

    let row = Value::Object(obj);
    check_unique(table, rows, &row, None)?;
    rows.push(row.clone());
    Ok(row)
}

fn update_in(
    tables: &mut HashMap<Table, Vec<Value>>,
    table: Table,
    patch: Value,
    filters: &[Filter],
) -> Result<Vec<Value>, StoreError> {
    let patch = as_object(patch)?;
    for filter in filters {
        check_identifier(&filter.column)?;
    }
    let rows = tables.entry(table).or_default();

    let targets: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| matches(r, filters))
        .map(|(i, _)| i)
        .collect();

    // Valida tudo antes de gravar qualquer linha
    let mut updated = Vec::with_capacity(targets.len());
    for &index in &targets {
        let mut merged = rows[index].clone();
        if let Some(target) = merged.as_object_mut() {
            target.extend(patch.clone());
        }
        check_unique(table, rows, &merged, Some(index))?;
        updated.push((index, merged));
    }

    let mut result = Vec::with_capacity(updated.len());
    for (index, row) in updated {
        rows[index] = row.clone();
        result.push(row);
    }
    Ok(result)
}

fn upsert_into(
    tables: &mut HashMap<Table, Vec<Value>>,
    table: Table,
    row: Value,
    conflict: &str,
) -> Result<Value, StoreError> {
    check_identifier(conflict)?;
    let obj = as_object(row)?;
    let conflict_value = obj.get(conflict).cloned().unwrap_or(Value::Null);

    let rows = tables.entry(table).or_default();
    let existing = rows
        .iter()
        .position(|r| !conflict_value.is_null() && r.get(conflict) == Some(&conflict_value));

    match existing {
        Some(index) => {
            let mut merged = rows[index].clone();
            if let Some(target) = merged.as_object_mut() {
                target.extend(obj);
            }
            check_unique(table, rows, &merged, Some(index))?;
            rows[index] = merged.clone();
            Ok(merged)
        }
        None => insert_into(tables, table, Value::Object(obj)),
    }
}

#[async_trait]
impl DataClient for MemoryDataClient {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.touch();
        for filter in &query.filters {
            check_identifier(&filter.column)?;
        }

        let tables = self.tables.lock();
        let mut rows: Vec<Value> = tables
            .get(&table)
            .map(|rows| rows.iter().filter(|r| matches(r, &query.filters)).cloned().collect())
            .unwrap_or_default();

        if let Some((column, direction)) = &query.order_by {
            check_identifier(column)?;
            rows.sort_by(|a, b| {
                let ord = compare(
                    a.get(column).unwrap_or(&Value::Null),
                    b.get(column).unwrap_or(&Value::Null),
                );
                match direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            });
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();
        insert_into(&mut tables, table, row)
    }

    async fn update(
        &self,
        table: Table,
        patch: Value,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();
        update_in(&mut tables, table, patch, filters)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();
        let rows = tables.entry(table).or_default();

        let (removed, kept): (Vec<Value>, Vec<Value>) = rows.drain(..).partition(|r| matches(r, filters));
        *rows = kept;

        // Mesmo efeito do ON DELETE CASCADE de clients.identity_id
        if table == Table::Identities {
            let ids: Vec<&Value> = removed.iter().filter_map(|r| r.get("id")).collect();
            if let Some(clients) = tables.get_mut(&Table::Clients) {
                clients.retain(|c| !c.get("identity_id").is_some_and(|v| ids.contains(&v)));
            }
        }
        Ok(removed.len() as u64)
    }

    async fn upsert(&self, table: Table, row: Value, conflict: &str) -> Result<Value, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();
        upsert_into(&mut tables, table, row, conflict)
    }

    async fn upsert_many(
        &self,
        table: Table,
        rows: Vec<Value>,
        conflict: &str,
    ) -> Result<Vec<Value>, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();

        // Trabalha numa cópia e só publica se tudo der certo
        let mut staged = tables.clone();
        let mut saved = Vec::with_capacity(rows.len());
        for row in rows {
            saved.push(upsert_into(&mut staged, table, row, conflict)?);
        }
        *tables = staged;
        Ok(saved)
    }

    async fn insert_linked(
        &self,
        parent: Table,
        parent_row: Value,
        child: Table,
        mut child_row: Value,
        link_column: &str,
    ) -> Result<(Value, Value), StoreError> {
        self.touch();
        check_identifier(link_column)?;
        let mut tables = self.tables.lock();

        let mut staged = tables.clone();
        let parent_saved = insert_into(&mut staged, parent, parent_row)?;
        let parent_id = parent_saved
            .get(parent.key_column())
            .cloned()
            .unwrap_or(Value::Null);

        match child_row.as_object_mut() {
            Some(obj) => {
                obj.insert(link_column.to_string(), parent_id);
            }
            None => return Err(StoreError::Database("a linha precisa ser um objeto JSON".into())),
        }
        let child_saved = insert_into(&mut staged, child, child_row)?;

        *tables = staged;
        Ok((parent_saved, child_saved))
    }

    async fn update_pair(&self, first: Update, second: Update) -> Result<Vec<Value>, StoreError> {
        self.touch();
        let mut tables = self.tables.lock();

        let mut staged = tables.clone();
        if update_in(&mut staged, first.table, first.patch, &first.filters)?.is_empty() {
            return Err(StoreError::NotFound);
        }
        let saved = update_in(&mut staged, second.table, second.patch, &second.filters)?;
        if saved.is_empty() {
            return Err(StoreError::NotFound);
        }

        *tables = staged;
        Ok(saved)
    }

    async fn swap(&self, table: Table, column: &str, a: Uuid, b: Uuid) -> Result<(), StoreError> {
        self.touch();
        check_identifier(column)?;
        let mut tables = self.tables.lock();
        let rows = tables.entry(table).or_default();

        let find = |id: Uuid| {
            let id = Value::String(id.to_string());
            rows.iter().position(|r| r.get("id") == Some(&id))
        };
        let (Some(ia), Some(ib)) = (find(a), find(b)) else {
            return Err(StoreError::NotFound);
        };
        if ia == ib {
            return Err(StoreError::NotFound);
        }

        let va = rows[ia].get(column).cloned().unwrap_or(Value::Null);
        let vb = rows[ib].get(column).cloned().unwrap_or(Value::Null);
        if let Some(obj) = rows[ia].as_object_mut() {
            obj.insert(column.to_string(), vb);
        }
        if let Some(obj) = rows[ib].as_object_mut() {
            obj.insert(column.to_string(), va);
        }
        Ok(())
    }
}
