//! HTTP boundary
//!
//! All requests land in [`dispatch`], the single place where a pipeline
//! outcome becomes an HTTP response. The router built by [`app`] wraps it in
//! panic recovery and request tracing, with the CORS headers outermost so
//! preflights and failures get them too.

pub mod context;
pub mod response;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::db::QueryExecutor;
use crate::error::{ApiError, ApiResult};
use crate::features;
use crate::middleware;
use crate::router::{Access, Route, RouteTable};

pub use context::RequestContext;

/// Process-wide, read-only state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn QueryExecutor>,
    pub verifier: Arc<TokenVerifier>,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    /// Build state with the standard route table
    pub fn new(config: Config, db: Arc<dyn QueryExecutor>) -> anyhow::Result<Self> {
        let verifier = TokenVerifier::new(config.auth.clone())?;

        Ok(Self {
            config: Arc::new(config),
            db,
            verifier: Arc::new(verifier),
            routes: Arc::new(features::route_table()),
        })
    }
}

/// Build the application router
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&state.config.cors.allowed_origin)?;

    let router = Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::tracing_layer());

    Ok(middleware::with_cors_headers(router, origin))
}

/// Bind and serve until a shutdown signal arrives
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let server = state.config.server.clone();
    let app = app(state)?;

    let addr: SocketAddr = format!("{}:{}", server.host, server.port).parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Boundary handler: preflight short-circuit, then table dispatch
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    let (parts, body) = request.into_parts();
    match route_request(state, parts, body).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[tracing::instrument(skip_all, fields(method = %parts.method, path = %parts.uri.path()))]
async fn route_request(state: AppState, parts: Parts, body: Body) -> ApiResult<Response> {
    let Route { access, handler } = state.routes.lookup(&parts.method, parts.uri.path())?;

    let principal = match access {
        Access::Public => None,
        Access::Admin => Some(state.verifier.verify(&parts.headers).await?),
    };

    handler(RequestContext::new(state, principal, body)).await
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("Unhandled fault: {}", detail)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received terminate signal, starting graceful shutdown"),
    }
}
