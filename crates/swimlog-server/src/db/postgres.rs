//! PostgreSQL implementation of [`QueryExecutor`]

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::postgres::{PgArguments, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};

use super::{DbError, DbResult, QueryExecutor, RowSet, SqlValue, Statement, StatementKind};

/// Executes statements against a sqlx connection pool
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    #[tracing::instrument(skip(self, statement), fields(kind = ?statement.kind, params = statement.params.len()))]
    async fn execute(&self, statement: &Statement) -> DbResult<RowSet> {
        let query = bind_all(sqlx::query(&statement.sql), &statement.params);

        match statement.kind {
            StatementKind::Query => {
                let rows = query.fetch_all(&self.pool).await?;
                let rows = rows.iter().map(decode_row).collect::<DbResult<Vec<_>>>()?;
                tracing::debug!(rows = rows.len(), "Query returned rows");
                Ok(RowSet {
                    rows_affected: rows.len() as u64,
                    rows,
                })
            },
            StatementKind::Execute => {
                let result = query.execute(&self.pool).await?;
                tracing::debug!(rows_affected = result.rows_affected(), "Statement executed");
                Ok(RowSet {
                    rows: Vec::new(),
                    rows_affected: result.rows_affected(),
                })
            },
        }
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn decode_row(row: &PgRow) -> DbResult<Map<String, Value>> {
    let mut object = Map::new();
    for column in row.columns() {
        let index = column.ordinal();
        let value = match column.type_info().name() {
            "INT2" => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
            "INT4" => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
            "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(index)?
                .and_then(|v| Number::from_f64(f64::from(v)))
                .map(Value::Number),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(index)?
                .and_then(Number::from_f64)
                .map(Value::Number),
            "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
                row.try_get::<Option<String>, _>(index)?.map(Value::from)
            },
            other => {
                return Err(DbError::UnsupportedColumn {
                    column: column.name().to_string(),
                    type_name: other.to_string(),
                })
            },
        };
        object.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(object)
}
