//! Admin check for clients deciding whether to show write controls

use axum::http::Method;
use axum::response::Response;
use futures::FutureExt;
use serde::Serialize;

use crate::api::{response, RequestContext};
use crate::error::{ApiError, ApiResult};
use crate::router::{Access, RouteTable};

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub allowed: bool,
    pub email: String,
}

pub fn register(table: &mut RouteTable) {
    table.insert(Method::POST, "/verify", Access::Admin, |ctx| verify(ctx).boxed());
}

/// Reaching the handler means verification already passed
#[tracing::instrument(skip_all)]
pub async fn verify(ctx: RequestContext) -> ApiResult<Response> {
    let principal = ctx
        .principal
        .ok_or_else(|| ApiError::Internal("Verify route reached without a principal".into()))?;

    Ok(response::ok(VerifyResponse {
        allowed: true,
        email: principal.email,
    }))
}
