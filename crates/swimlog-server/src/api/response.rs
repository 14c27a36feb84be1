//! Success response builders

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::RowSet;

/// Body of a successful write
#[derive(Debug, Serialize)]
pub struct Created {
    pub created: u64,
}

/// 201 with the number of rows the write affected
pub fn created(rows: RowSet) -> Response {
    (
        StatusCode::CREATED,
        Json(Created {
            created: rows.rows_affected,
        }),
    )
        .into_response()
}

/// 200 with the rows as a JSON array, in engine order
pub fn rows_json(rows: RowSet) -> Response {
    (StatusCode::OK, Json(rows.into_json())).into_response()
}

/// 200 with any serialisable body
pub fn ok<T: Serialize>(body: T) -> Response {
    (StatusCode::OK, Json(body)).into_response()
}
