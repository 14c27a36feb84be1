//! Meets
//!
//! - `POST /meets` - Create a meet (admin)
//! - `GET /meets` - All meets, newest first
//! - `GET /recent_meets` - The five newest meets

pub mod commands;
pub mod queries;

use axum::http::Method;
use futures::FutureExt;

use crate::router::{Access, RouteTable};

pub use commands::CreateMeetCommand;

pub fn register(table: &mut RouteTable) {
    table.insert(Method::POST, "/meets", Access::Admin, |ctx| commands::create(ctx).boxed());
    table.insert(Method::GET, "/meets", Access::Public, |ctx| queries::list(ctx).boxed());
    table.insert(Method::GET, "/recent_meets", Access::Public, |ctx| {
        queries::recent(ctx).boxed()
    });
}
