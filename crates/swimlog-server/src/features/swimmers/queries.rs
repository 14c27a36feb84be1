//! Swimmer listing

use axum::response::Response;

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

pub const LIST_SWIMMERS_SQL: &str = "SELECT id, name, graduating_year FROM swimmers ORDER BY id ASC";

#[tracing::instrument(skip_all)]
pub async fn list(ctx: RequestContext) -> ApiResult<Response> {
    let rows = ctx.state.db.execute(&Statement::query(LIST_SWIMMERS_SQL)).await?;
    Ok(response::rows_json(rows))
}
