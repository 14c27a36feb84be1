//! Results feed: every record with its meet and swimmer

use axum::http::Method;
use axum::response::Response;
use futures::FutureExt;

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;
use crate::router::{Access, RouteTable};

/// Newest meets first, fastest swims first within a meet date
pub const LIST_RESULTS_SQL: &str = r#"
SELECT
    r.id,
    r.event,
    r.type,
    r.start,
    r.time,
    m.id AS meet_id,
    m.name AS meet_name,
    m.location AS meet_location,
    m.date AS meet_date,
    s.id AS swimmer_id,
    s.name AS swimmer_name,
    s.graduating_year
FROM records r
JOIN meets m ON m.id = r.meet_id
JOIN swimmers s ON s.id = r.swimmer_id
ORDER BY m.date DESC, r.time ASC, r.id ASC
"#;

pub fn register(table: &mut RouteTable) {
    table.insert(Method::GET, "/", Access::Public, |ctx| list(ctx).boxed());
}

#[tracing::instrument(skip_all)]
pub async fn list(ctx: RequestContext) -> ApiResult<Response> {
    let rows = ctx.state.db.execute(&Statement::query(LIST_RESULTS_SQL)).await?;
    tracing::debug!(rows = rows.rows.len(), "Listed results");
    Ok(response::rows_json(rows))
}
