//! Batch record insertion
//!
//! A batch is written with a single multi-row `INSERT`, so either every
//! record lands or none does. `type` and `start` are validated separately; a
//! relay leg with a flat start is accepted.

use axum::response::Response;
use serde::{Deserialize, Serialize};
use swimlog_common::schema::{Field, Schema};
use swimlog_common::types::{Event, RecordType, StartType};

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

/// Insert columns, in the order parameters are bound for each row
pub const RECORD_COLUMNS: [&str; 6] = ["meet_id", "swimmer_id", "event", "type", "time", "start"];

/// PostgreSQL accepts at most this many bind parameters per statement
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Largest batch that still fits in one `INSERT`
pub const MAX_BATCH_RECORDS: usize = MAX_BIND_PARAMS / RECORD_COLUMNS.len();

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordEntry {
    pub meet_id: i64,
    pub swimmer_id: i64,
    pub event: Event,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub start: StartType,
    /// Seconds
    pub time: f64,
}

impl RecordEntry {
    pub fn schema() -> Schema {
        Schema::object(vec![
            Field::required("meet_id", Schema::Integer),
            Field::required("swimmer_id", Schema::Integer),
            Field::required("event", Schema::one_of(Event::CODES)),
            Field::required("type", Schema::one_of(RecordType::CODES)),
            Field::required("start", Schema::one_of(StartType::CODES)),
            Field::required("time", Schema::PositiveNumber),
        ])
    }
}

/// Records posted together, between 1 and [`MAX_BATCH_RECORDS`] of them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RecordBatch(pub Vec<RecordEntry>);

impl RecordBatch {
    pub fn schema() -> Schema {
        Schema::bounded_array(RecordEntry::schema(), 1, MAX_BATCH_RECORDS)
    }

    /// One `INSERT` with a value group per record and row-major parameters
    pub fn statement(&self) -> Statement {
        let width = RECORD_COLUMNS.len();
        let groups = (0..self.0.len())
            .map(|row| {
                let placeholders = (1..=width)
                    .map(|col| format!("${}", row * width + col))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({})", placeholders)
            })
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "INSERT INTO records ({}) VALUES {}",
            RECORD_COLUMNS.join(", "),
            groups
        );

        self.0.iter().fold(Statement::execute(sql), |statement, record| {
            statement
                .bind(record.meet_id)
                .bind(record.swimmer_id)
                .bind(record.event.as_str())
                .bind(record.record_type.as_str())
                .bind(record.time)
                .bind(record.start.as_str())
        })
    }
}

#[tracing::instrument(skip_all)]
pub async fn create(mut ctx: RequestContext) -> ApiResult<Response> {
    let batch: RecordBatch = ctx.parse_body(&RecordBatch::schema()).await?;
    let rows = ctx.state.db.execute(&batch.statement()).await?;

    tracing::info!(records = batch.0.len(), "Record batch inserted");
    Ok(response::created(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlValue;
    use serde_json::json;
    use swimlog_common::schema;

    fn record(meet_id: i64, time: f64) -> serde_json::Value {
        json!({
            "meet_id": meet_id,
            "swimmer_id": 7,
            "event": "100_fly",
            "type": "individual",
            "start": "flat",
            "time": time,
        })
    }

    #[test]
    fn test_two_records_make_one_statement_with_two_groups() {
        let batch: RecordBatch =
            schema::parse(&RecordBatch::schema(), &json!([record(1, 61.2), record(2, 59.8)]))
                .unwrap();

        let statement = batch.statement();
        assert_eq!(
            statement.sql,
            "INSERT INTO records (meet_id, swimmer_id, event, type, time, start) \
             VALUES ($1, $2, $3, $4, $5, $6), ($7, $8, $9, $10, $11, $12)"
        );
        assert_eq!(
            statement.params,
            vec![
                SqlValue::Integer(1),
                SqlValue::Integer(7),
                SqlValue::Text("100_fly".into()),
                SqlValue::Text("individual".into()),
                SqlValue::Real(61.2),
                SqlValue::Text("flat".into()),
                SqlValue::Integer(2),
                SqlValue::Integer(7),
                SqlValue::Text("100_fly".into()),
                SqlValue::Text("individual".into()),
                SqlValue::Real(59.8),
                SqlValue::Text("flat".into()),
            ]
        );
    }

    #[test]
    fn test_negative_time_is_reported_with_index() {
        let err = schema::validate(&RecordBatch::schema(), &json!([record(1, 60.0), record(1, -1.0)]))
            .unwrap_err();
        assert_eq!(err.to_string(), "1.time: Number must be greater than 0");
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let err = schema::validate(&RecordBatch::schema(), &json!([])).unwrap_err();
        assert_eq!(err.to_string(), "<root>: Array must contain at least 1 element(s)");
    }

    #[test]
    fn test_batch_is_capped_by_bind_parameter_limit() {
        assert_eq!(MAX_BATCH_RECORDS, 10_922);

        let full = vec![record(1, 50.0); MAX_BATCH_RECORDS];
        let batch: RecordBatch = schema::parse(&RecordBatch::schema(), &json!(full)).unwrap();
        assert_eq!(batch.statement().params.len(), MAX_BATCH_RECORDS * RECORD_COLUMNS.len());
        assert!(batch.statement().params.len() <= MAX_BIND_PARAMS);

        let over = vec![record(1, 50.0); MAX_BATCH_RECORDS + 1];
        let err = schema::validate(&RecordBatch::schema(), &json!(over)).unwrap_err();
        assert_eq!(err.to_string(), "<root>: Array must contain at most 10922 element(s)");
    }

    #[test]
    fn test_type_and_start_are_independent() {
        let mut entry = record(1, 25.1);
        entry["type"] = json!("relay");
        entry["start"] = json!("flat");
        assert!(schema::parse::<RecordBatch>(&RecordBatch::schema(), &json!([entry])).is_ok());
    }
}
