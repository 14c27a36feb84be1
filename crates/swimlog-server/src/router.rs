//! Route dispatch table
//!
//! Routes are looked up by exact `"METHOD /path"` key. There is no pattern
//! matching and no trailing-slash normalisation: `/meets/` is not `/meets`.

use axum::http::Method;
use axum::response::Response;
use futures::future::BoxFuture;
use std::collections::HashMap;

use crate::api::RequestContext;
use crate::error::{ApiError, ApiResult};

/// Future returned by every handler
pub type HandlerFuture = BoxFuture<'static, ApiResult<Response>>;

/// A handler consumes the request context and yields a response or an error
pub type Handler = fn(RequestContext) -> HandlerFuture;

/// Who may call a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Caller must present a bearer token for an allow-listed admin
    Admin,
}

#[derive(Clone, Copy)]
pub struct Route {
    pub access: Access,
    pub handler: Handler,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("access", &self.access).finish_non_exhaustive()
    }
}

/// Flat `"METHOD /path"` → [`Route`] map
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(method: &Method, path: &str) -> String {
        format!("{} {}", method, path)
    }

    /// Register a route, replacing any previous entry for the same key
    pub fn insert(&mut self, method: Method, path: &str, access: Access, handler: Handler) {
        self.routes
            .insert(Self::key(&method, path), Route { access, handler });
    }

    pub fn lookup(&self, method: &Method, path: &str) -> ApiResult<Route> {
        let key = Self::key(method, path);
        self.routes
            .get(&key)
            .copied()
            .ok_or_else(|| ApiError::NotFound(format!("No route for {}", key)))
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
