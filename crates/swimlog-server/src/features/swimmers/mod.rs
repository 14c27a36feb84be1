//! Swimmers
//!
//! - `POST /swimmers` - Add a swimmer (admin)
//! - `GET /swimmers` - All swimmers in insertion order

pub mod commands;
pub mod queries;

use axum::http::Method;
use futures::FutureExt;

use crate::router::{Access, RouteTable};

pub use commands::CreateSwimmerCommand;

pub fn register(table: &mut RouteTable) {
    table.insert(Method::POST, "/swimmers", Access::Admin, |ctx| {
        commands::create(ctx).boxed()
    });
    table.insert(Method::GET, "/swimmers", Access::Public, |ctx| queries::list(ctx).boxed());
}
