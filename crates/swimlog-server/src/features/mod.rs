//! Feature slices of the swimlog API
//!
//! Each slice owns its request types, their schemas, the SQL it runs and a
//! `register` function that adds its routes to the table.
//!
//! # Features
//!
//! - **results**: the joined results feed (`GET /`)
//! - **meets**: create and list meets
//! - **swimmers**: create and list swimmers
//! - **records**: batch-insert and list individual records
//! - **relays**: record relay results
//! - **verify**: check whether the caller is an admin
//!
//! # Architecture
//!
//! Write slices follow `commands` (validated input plus the statement it
//! produces), read slices follow `queries`. Handlers are plain async
//! functions composed with `?`; nothing is shared between requests except
//! [`crate::api::AppState`].

pub mod meets;
pub mod records;
pub mod relays;
pub mod results;
pub mod swimmers;
pub mod verify;

use crate::router::RouteTable;

/// Build the complete route table
pub fn route_table() -> RouteTable {
    let mut table = RouteTable::new();
    results::register(&mut table);
    meets::register(&mut table);
    swimmers::register(&mut table);
    records::register(&mut table);
    relays::register(&mut table);
    verify::register(&mut table);
    table
}
