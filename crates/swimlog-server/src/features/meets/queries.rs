//! Meet listings

use axum::response::Response;

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

pub const LIST_MEETS_SQL: &str =
    "SELECT id, name, location, date FROM meets ORDER BY date DESC, id DESC";

/// How many meets `GET /recent_meets` returns at most
pub const RECENT_MEETS_LIMIT: i64 = 5;

pub fn recent_statement() -> Statement {
    Statement::query(format!("{} LIMIT $1", LIST_MEETS_SQL)).bind(RECENT_MEETS_LIMIT)
}

#[tracing::instrument(skip_all)]
pub async fn list(ctx: RequestContext) -> ApiResult<Response> {
    let rows = ctx.state.db.execute(&Statement::query(LIST_MEETS_SQL)).await?;
    Ok(response::rows_json(rows))
}

#[tracing::instrument(skip_all)]
pub async fn recent(ctx: RequestContext) -> ApiResult<Response> {
    let rows = ctx.state.db.execute(&recent_statement()).await?;
    Ok(response::rows_json(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{SqlValue, StatementKind};

    #[test]
    fn test_meets_newest_first_with_stable_ties() {
        assert!(LIST_MEETS_SQL.ends_with("FROM meets ORDER BY date DESC, id DESC"));
    }

    #[test]
    fn test_recent_is_bounded() {
        let statement = recent_statement();
        assert_eq!(statement.kind, StatementKind::Query);
        assert!(statement.sql.ends_with("ORDER BY date DESC, id DESC LIMIT $1"));
        assert_eq!(statement.params, vec![SqlValue::Integer(5)]);
    }
}
