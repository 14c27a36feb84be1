//! Swimlog Server Library
//!
//! HTTP API recording swim-meet results: meets, swimmers, individual records
//! and relays, stored in PostgreSQL.
//!
//! # Architecture
//!
//! Every request goes through the same pipeline:
//!
//! - **Routing**: exact `"METHOD /path"` lookup in a [`router::RouteTable`]
//! - **Authentication**: write routes verify a Google ID token
//!   ([`auth::TokenVerifier`]) and check the caller against an allow-list
//! - **Validation**: request bodies are checked against a declared
//!   [`swimlog_common::Schema`], with every violation reported at once
//! - **Storage**: one parameterised statement per request through a
//!   [`db::QueryExecutor`]
//!
//! Each step returns an [`error::ApiResult`] and handlers chain them with `?`.
//! The boundary in [`api`] renders the outcome and attaches CORS headers.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use swimlog_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let state = api::AppState::new(config, Arc::new(db::PgExecutor::new(pool)))?;
//!     api::serve(state).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod router;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
