//! Relay results
//!
//! The four record ids are stored as given; they are not checked against
//! `records`.

use axum::http::Method;
use axum::response::Response;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use swimlog_common::schema::{Field, Schema};
use swimlog_common::types::RelayType;

use crate::api::{response, RequestContext};
use crate::db::Statement;
use crate::error::ApiResult;
use crate::router::{Access, RouteTable};

/// Command to record a relay result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRelayCommand {
    /// Total time in seconds
    pub time: f64,
    pub relay_type: RelayType,
    pub record_1_id: i64,
    pub record_2_id: i64,
    pub record_3_id: i64,
    pub record_4_id: i64,
}

impl CreateRelayCommand {
    pub fn schema() -> Schema {
        Schema::object(vec![
            Field::required("time", Schema::PositiveNumber),
            Field::required("relay_type", Schema::one_of(RelayType::CODES)),
            Field::required("record_1_id", Schema::Integer),
            Field::required("record_2_id", Schema::Integer),
            Field::required("record_3_id", Schema::Integer),
            Field::required("record_4_id", Schema::Integer),
        ])
    }

    pub fn statement(&self) -> Statement {
        Statement::execute(
            "INSERT INTO relays (time, relay_type, record_1_id, record_2_id, record_3_id, record_4_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(self.time)
        .bind(self.relay_type.as_str())
        .bind(self.record_1_id)
        .bind(self.record_2_id)
        .bind(self.record_3_id)
        .bind(self.record_4_id)
    }
}

pub fn register(table: &mut RouteTable) {
    table.insert(Method::POST, "/relays", Access::Admin, |ctx| create(ctx).boxed());
}

#[tracing::instrument(skip_all)]
pub async fn create(mut ctx: RequestContext) -> ApiResult<Response> {
    let command: CreateRelayCommand = ctx.parse_body(&CreateRelayCommand::schema()).await?;
    let rows = ctx.state.db.execute(&command.statement()).await?;

    tracing::info!(relay_type = %command.relay_type, time = command.time, "Relay recorded");
    Ok(response::created(rows))
}
