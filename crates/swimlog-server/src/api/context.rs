//! Per-request context handed to every handler

use axum::body::{self, Body};
use serde::de::DeserializeOwned;
use swimlog_common::schema::{self, Schema};

use super::AppState;
use crate::auth::Principal;
use crate::error::{ApiError, ApiResult};

/// Largest request body a handler will read
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct RequestContext {
    pub state: AppState,
    /// Set when the route required an admin and verification succeeded
    pub principal: Option<Principal>,
    body: Body,
}

impl RequestContext {
    pub fn new(state: AppState, principal: Option<Principal>, body: Body) -> Self {
        Self {
            state,
            principal,
            body,
        }
    }

    /// Read the body, parse it as JSON and validate it against `shape`
    ///
    /// The body can only be consumed once; a second call sees an empty body.
    pub async fn parse_body<T: DeserializeOwned>(&mut self, shape: &Schema) -> ApiResult<T> {
        let body = std::mem::take(&mut self.body);

        let bytes = body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ApiError::MalformedRequest(format!("Failed to read request body: {}", e)))?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::MalformedRequest(format!("Request body is not valid JSON: {}", e)))?;

        Ok(schema::parse(shape, &value)?)
    }
}
