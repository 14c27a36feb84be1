//! Swimlog Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the swimlog workspace.
//!
//! # Overview
//!
//! - **Logging**: tracing subscriber setup driven by environment variables
//! - **Schema**: declarative validation of untyped JSON with aggregated reports
//! - **Types**: the fixed vocabularies of the domain (events, starts, relays)
//!
//! # Example
//!
//! ```no_run
//! use swimlog_common::schema::{self, Field, Schema};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Swimmer {
//!     name: String,
//!     graduating_year: i64,
//! }
//!
//! let shape = Schema::object(vec![
//!     Field::required("name", Schema::non_empty_string()),
//!     Field::required("graduating_year", Schema::Integer),
//! ]);
//!
//! let raw = serde_json::json!({ "name": "Ada", "graduating_year": 2027 });
//! let swimmer: Swimmer = schema::parse(&shape, &raw)?;
//! # Ok::<(), swimlog_common::schema::SchemaError>(())
//! ```

pub mod logging;
pub mod schema;
pub mod types;

pub use schema::{Schema, SchemaError};
