// src/db/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{check_identifier, DataClient, Direction, Filter, Query, StoreError, Table, Update};

// O cliente de dados sobre o Postgres.
// As linhas entram via `jsonb_populate_record` e saem via `to_jsonb`, então uma
// única implementação atende todas as tabelas.
#[derive(Clone)]
pub struct PgDataClient {
    pool: PgPool,
}

impl PgDataClient {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// Converte o erro do sqlx no nosso conjunto fechado de erros
fn map_sqlx_error(table: Table, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            if db_err.is_unique_violation() {
                StoreError::UniqueViolation {
                    table: table.name(),
                    column: db_err.constraint().and_then(|c| table.column_for_constraint(c)),
                }
            } else if db_err.is_foreign_key_violation() {
                StoreError::ForeignKeyViolation { table: table.name() }
            } else {
                StoreError::Database(db_err.to_string())
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Database(err.to_string()),
    }
}

/// Colunas presentes na linha, já validadas como identificadores.
fn columns_of(row: &Value) -> Result<Vec<String>, StoreError> {
    let obj = row
        .as_object()
        .ok_or_else(|| StoreError::Database("a linha precisa ser um objeto JSON".into()))?;
    if obj.is_empty() {
        return Err(StoreError::Database("linha sem colunas".into()));
    }
    obj.keys()
        .map(|k| check_identifier(k).map(str::to_string))
        .collect()
}

fn quoted(columns: &[String], prefix: Option<&str>) -> String {
    columns
        .iter()
        .map(|c| match prefix {
            Some(p) => format!("{p}.\"{c}\""),
            None => format!("\"{c}\""),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, filters: &[Filter]) -> Result<(), StoreError> {
    for (i, filter) in filters.iter().enumerate() {
        check_identifier(&filter.column)?;
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push("(to_jsonb(t) -> ");
        qb.push_bind(filter.column.clone());
        qb.push(") = ");
        qb.push_bind(Json(filter.value.clone()));
    }
    Ok(())
}

async fn insert_row<'e, E>(executor: E, table: Table, row: &Value) -> Result<Value, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    let columns = columns_of(row)?;

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "INSERT INTO \"{}\" AS t ({}) SELECT {} FROM jsonb_populate_record(NULL::\"{}\", ",
        table.name(),
        quoted(&columns, None),
        quoted(&columns, Some("r")),
        table.name(),
    ));
    qb.push_bind(Json(row.clone()));
    qb.push(") AS r RETURNING to_jsonb(t)");

    qb.build_query_scalar::<Value>()
        .fetch_one(executor)
        .await
        .map_err(|e| map_sqlx_error(table, e))
}

async fn upsert_row<'e, E>(
    executor: E,
    table: Table,
    row: &Value,
    conflict: &str,
) -> Result<Value, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    let conflict = check_identifier(conflict)?;
    let columns = columns_of(row)?;

    let assignments = columns
        .iter()
        .map(|c| format!("\"{c}\" = EXCLUDED.\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "INSERT INTO \"{}\" AS t ({}) SELECT {} FROM jsonb_populate_record(NULL::\"{}\", ",
        table.name(),
        quoted(&columns, None),
        quoted(&columns, Some("r")),
        table.name(),
    ));
    qb.push_bind(Json(row.clone()));
    qb.push(format!(
        ") AS r ON CONFLICT (\"{conflict}\") DO UPDATE SET {assignments} RETURNING to_jsonb(t)"
    ));

    qb.build_query_scalar::<Value>()
        .fetch_one(executor)
        .await
        .map_err(|e| map_sqlx_error(table, e))
}

async fn update_rows<'e, E>(
    executor: E,
    table: Table,
    patch: &Value,
    filters: &[Filter],
) -> Result<Vec<Value>, StoreError>
where
    E: Executor<'e, Database = Postgres>,
{
    let columns = columns_of(patch)?;
    let assignments = columns
        .iter()
        .map(|c| format!("\"{c}\" = r.\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "UPDATE \"{}\" AS t SET {} FROM jsonb_populate_record(NULL::\"{}\", ",
        table.name(),
        assignments,
        table.name(),
    ));
    qb.push_bind(Json(patch.clone()));
    qb.push(") AS r");
    push_where(&mut qb, filters)?;
    qb.push(" RETURNING to_jsonb(t)");

    qb.build_query_scalar::<Value>()
        .fetch_all(executor)
        .await
        .map_err(|e| map_sqlx_error(table, e))
}

#[async_trait]
impl DataClient for PgDataClient {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT to_jsonb(t) FROM \"{}\" AS t",
            table.name()
        ));
        push_where(&mut qb, &query.filters)?;

        if let Some((column, direction)) = &query.order_by {
            let column = check_identifier(column)?;
            let dir = match direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            qb.push(format!(" ORDER BY t.\"{column}\" {dir}"));
        }

        qb.build_query_scalar::<Value>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(table, e))
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        insert_row(&self.pool, table, &row).await
    }

    async fn update(
        &self,
        table: Table,
        patch: Value,
        filters: &[Filter],
    ) -> Result<Vec<Value>, StoreError> {
        update_rows(&self.pool, table, &patch, filters).await
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("DELETE FROM \"{}\" AS t", table.name()));
        push_where(&mut qb, filters)?;

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(table, e))?;

        Ok(result.rows_affected())
    }

    async fn upsert(&self, table: Table, row: Value, conflict: &str) -> Result<Value, StoreError> {
        upsert_row(&self.pool, table, &row, conflict).await
    }

    async fn upsert_many(
        &self,
        table: Table,
        rows: Vec<Value>,
        conflict: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error(table, e))?;

        let mut saved = Vec::with_capacity(rows.len());
        for row in &rows {
            // Se falhar aqui, o tx sofre rollback automático ao sair do escopo (drop)
            saved.push(upsert_row(&mut *tx, table, row, conflict).await?);
        }

        tx.commit().await.map_err(|e| map_sqlx_error(table, e))?;
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
        check_identifier(link_column)?;

        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error(parent, e))?;

        let parent_saved = insert_row(&mut *tx, parent, &parent_row).await?;
        let parent_id = parent_saved
            .get(parent.key_column())
            .cloned()
            .ok_or_else(|| StoreError::Database(format!("{} sem chave", parent.name())))?;

        match child_row.as_object_mut() {
            Some(obj) => {
                obj.insert(link_column.to_string(), parent_id);
            }
            None => return Err(StoreError::Database("a linha precisa ser um objeto JSON".into())),
        }

        // Se o filho falhar, o pai criado acima é desfeito junto
        let child_saved = insert_row(&mut *tx, child, &child_row).await?;

        tx.commit().await.map_err(|e| map_sqlx_error(child, e))?;
        Ok((parent_saved, child_saved))
    }

    async fn update_pair(&self, first: Update, second: Update) -> Result<Vec<Value>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| map_sqlx_error(first.table, e))?;

        let touched = update_rows(&mut *tx, first.table, &first.patch, &first.filters).await?;
        if touched.is_empty() {
            return Err(StoreError::NotFound);
        }
        let saved = update_rows(&mut *tx, second.table, &second.patch, &second.filters).await?;
        if saved.is_empty() {
            // o drop do tx desfaz o primeiro update
            return Err(StoreError::NotFound);
        }

        tx.commit().await.map_err(|e| map_sqlx_error(second.table, e))?;
        Ok(saved)
    }

    async fn swap(&self, table: Table, column: &str, a: Uuid, b: Uuid) -> Result<(), StoreError> {
        let column = check_identifier(column)?;

        // Um único UPDATE com auto-join: as duas linhas mudam juntas ou nenhuma muda
        let result = sqlx::query(&format!(
            "UPDATE \"{table}\" AS t SET \"{column}\" = s.\"{column}\" \
             FROM \"{table}\" AS s \
             WHERE (t.id = $1 AND s.id = $2) OR (t.id = $2 AND s.id = $1)",
            table = table.name(),
        ))
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(table, e))?;

        if result.rows_affected() != 2 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Colunas lidas como i64 precisam ser BIGINT no esquema final
    #[test]
    fn wide_counters_are_bigint() {
        let migrator = sqlx::migrate!();
        let sql: String = migrator.iter().map(|m| m.sql.to_string()).collect();

        for column in ["consultation_limit", "position"] {
            assert!(
                sql.contains(&format!("ALTER COLUMN {column} TYPE BIGINT")),
                "{column} ainda é INTEGER"
            );
        }
    }
}
