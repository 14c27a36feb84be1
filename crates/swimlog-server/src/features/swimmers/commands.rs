//! Create swimmer command

use axum::response::Response;
use serde::{Deserialize, Serialize};
use swimlog_common::schema::{Field, Schema};

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSwimmerCommand {
    pub name: String,
    pub graduating_year: i64,
}

impl CreateSwimmerCommand {
    pub fn schema() -> Schema {
        Schema::object(vec![
            Field::required("name", Schema::non_empty_string()),
            Field::required("graduating_year", Schema::Integer),
        ])
    }

    pub fn statement(&self) -> Statement {
        Statement::execute("INSERT INTO swimmers (name, graduating_year) VALUES ($1, $2)")
            .bind(self.name.as_str())
            .bind(self.graduating_year)
    }
}

#[tracing::instrument(skip_all)]
pub async fn create(mut ctx: RequestContext) -> ApiResult<Response> {
    let command: CreateSwimmerCommand = ctx.parse_body(&CreateSwimmerCommand::schema()).await?;
    let rows = ctx.state.db.execute(&command.statement()).await?;

    tracing::info!(name = %command.name, "Swimmer created");
    Ok(response::created(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swimlog_common::schema;

    #[test]
    fn test_reports_both_fields() {
        let err = schema::validate(
            &CreateSwimmerCommand::schema(),
            &json!({ "name": "", "graduating_year": "2027" }),
        )
        .unwrap_err();

        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "name: String must contain at least 1 character(s); \
             graduating_year: Expected number, received string"
        );
    }
}
