//! Record listing

use axum::response::Response;

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

pub const LIST_RECORDS_SQL: &str =
    "SELECT id, meet_id, swimmer_id, event, type, start, time FROM records ORDER BY id DESC";

#[tracing::instrument(skip_all)]
pub async fn list(ctx: RequestContext) -> ApiResult<Response> {
    let rows = ctx.state.db.execute(&Statement::query(LIST_RECORDS_SQL)).await?;
    Ok(response::rows_json(rows))
}
