//! Create meet command

use axum::response::Response;
use serde::{Deserialize, Serialize};
use swimlog_common::schema::{Field, Schema};

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;

/// Command to create a new meet
///
/// # Examples
///
/// ```rust,ignore
/// let command = CreateMeetCommand {
///     name: "Winter Invitational".to_string(),
///     location: "Aquatic Center".to_string(),
///     date: 20240113,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMeetCommand {
    pub name: String,
    pub location: String,
    /// Day-encoded date, e.g. `20240113`
    pub date: i64,
}

impl CreateMeetCommand {
    pub fn schema() -> Schema {
        Schema::object(vec![
            Field::required("name", Schema::non_empty_string()),
            Field::required("location", Schema::non_empty_string()),
            Field::required("date", Schema::Integer),
        ])
    }

    pub fn statement(&self) -> Statement {
        Statement::execute("INSERT INTO meets (name, location, date) VALUES ($1, $2, $3)")
            .bind(self.name.as_str())
            .bind(self.location.as_str())
            .bind(self.date)
    }
}

#[tracing::instrument(skip_all)]
pub async fn create(mut ctx: RequestContext) -> ApiResult<Response> {
    let command: CreateMeetCommand = ctx.parse_body(&CreateMeetCommand::schema()).await?;
    let rows = ctx.state.db.execute(&command.statement()).await?;

    tracing::info!(name = %command.name, date = command.date, "Meet created");
    Ok(response::created(rows))
}
