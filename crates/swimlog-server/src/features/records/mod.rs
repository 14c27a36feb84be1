//! Individual records
//!
//! - `POST /records` - Insert a batch of records in one statement (admin)
//! - `GET /records` - Raw records, newest first

pub mod commands;
pub mod queries;

use axum::http::Method;
use futures::FutureExt;

use crate::router::{Access, RouteTable};

pub use commands::{RecordBatch, RecordEntry};

pub fn register(table: &mut RouteTable) {
    table.insert(Method::POST, "/records", Access::Admin, |ctx| {
        commands::create(ctx).boxed()
    });
    table.insert(Method::GET, "/records", Access::Public, |ctx| queries::list(ctx).boxed());
}
