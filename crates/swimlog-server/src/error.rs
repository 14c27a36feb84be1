//! Error taxonomy of the request pipeline
//!
//! Every fallible step of a handler returns [`ApiResult`]. The variants are
//! closed: each one has a fixed status code and a kind name, and the boundary
//! renders them all the same way, as `{"error": "<Kind>: <message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use swimlog_common::SchemaError;
use thiserror::Error;

use crate::db::DbError;

/// Result type alias for pipeline steps
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Application error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request could not be read or is not JSON
    #[error("{0}")]
    MalformedRequest(String),

    /// Request body is JSON but does not match the declared schema.
    /// Rendered under the `MalformedRequest` kind name.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Identity provider unreachable or answered with a non-success status
    #[error("{0}")]
    NoResponse(String),

    /// Identity provider answered with unparseable or ill-shaped claims
    #[error("{0}")]
    MalformedResponse(String),

    #[error("{0}")]
    InternalDatabase(String),

    /// Faults outside the documented sources (panics, response building)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "MalformedRequest",
            ApiError::Validation(_) => "MalformedRequest",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::NotFound(_) => "NotFound",
            ApiError::NoResponse(_) => "NoResponse",
            ApiError::MalformedResponse(_) => "MalformedResponse",
            ApiError::InternalDatabase(_) => "InternalDatabase",
            ApiError::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoResponse(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalDatabase(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Body text of the rendered response
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let description = self.describe();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), status = status.as_u16(), "{}", description);
        } else {
            tracing::debug!(kind = self.kind(), status = status.as_u16(), "{}", description);
        }

        (status, Json(json!({ "error": description }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::InternalDatabase(err.to_string())
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
