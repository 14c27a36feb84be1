//! Common test utilities for swimlog server integration tests
//!
//! Requests are driven straight into the axum router with
//! `tower::ServiceExt::oneshot`. Storage is replaced by a
//! [`RecordingExecutor`] that remembers every statement it was asked to run,
//! and Google's tokeninfo endpoint by a `wiremock` server.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::TestApp;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::start().await;
//!     app.mount_token(common::admin_claims()).await;
//!
//!     let response = app.post("/verify", None).await;
//!     assert_eq!(response.status, 200);
//! }
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use swimlog_server::api::{self, AppState};
use swimlog_server::config::Config;
use swimlog_server::db::{DbError, DbResult, QueryExecutor, RowSet, Statement, StatementKind};

pub const CLIENT_ID: &str = "swimlog-test.apps.googleusercontent.com";
pub const ADMIN_EMAIL: &str = "coach@example.com";
pub const ORIGIN: &str = "https://swim.example";
pub const TOKEN: &str = "test-id-token";

// ============================================================================
// Recording storage
// ============================================================================

/// What the executor does for the next statement
pub enum Reply {
    Rows(RowSet),
    Fail(String),
    Panic,
}

/// In-memory [`QueryExecutor`] that records statements and replays queued
/// replies
///
/// With nothing queued a query returns no rows and a write reports one
/// affected row.
#[derive(Default)]
pub struct RecordingExecutor {
    statements: Mutex<Vec<Statement>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingExecutor {
    pub fn reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn reply_rows(&self, rows: Value) {
        let rows = match rows {
            Value::Array(rows) => rows
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        self.reply(Reply::Rows(RowSet {
            rows_affected: 0,
            rows,
        }));
    }

    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, statement: &Statement) -> DbResult<RowSet> {
        self.statements.lock().unwrap().push(statement.clone());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Fail(message)) => Err(DbError::Engine(message)),
            Some(Reply::Panic) => panic!("storage exploded"),
            None => Ok(RowSet {
                rows: Vec::new(),
                rows_affected: match statement.kind {
                    StatementKind::Query => 0,
                    StatementKind::Execute => 1,
                },
            }),
        }
    }
}

// ============================================================================
// Application harness
// ============================================================================

pub fn test_config(tokeninfo_url: String) -> Config {
    let mut config = Config::default();
    config.cors.allowed_origin = ORIGIN.to_string();
    config.auth.client_id = CLIENT_ID.to_string();
    config.auth.admin_emails = vec![ADMIN_EMAIL.to_string()];
    config.auth.tokeninfo_url = tokeninfo_url;
    config.auth.tokeninfo_timeout_secs = 5;
    config
}

pub fn build_router(config: Config, db: Arc<dyn QueryExecutor>) -> Router {
    let state = AppState::new(config, db).expect("Failed to build state");
    api::app(state).expect("Failed to build router")
}

/// Response pieces the tests look at
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn error(&self) -> String {
        self.json()["error"]
            .as_str()
            .expect("Response has no error message")
            .to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<RecordingExecutor>,
    pub idp: MockServer,
}

impl TestApp {
    pub async fn start() -> Self {
        init_test_tracing();

        let idp = MockServer::start().await;
        let db = Arc::new(RecordingExecutor::default());
        let config = test_config(format!("{}/tokeninfo", idp.uri()));
        let router = build_router(config, db.clone());

        Self { router, db, idp }
    }

    /// Answer tokeninfo calls for [`TOKEN`] with `claims`
    pub async fn mount_token(&self, claims: Value) {
        self.mount_tokeninfo(ResponseTemplate::new(200).set_body_json(claims))
            .await;
    }

    pub async fn mount_tokeninfo(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/tokeninfo"))
            .and(query_param("id_token", TOKEN))
            .respond_with(response)
            .mount(&self.idp)
            .await;
    }

    pub async fn tokeninfo_calls(&self) -> usize {
        self.idp
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST with the test bearer token
    pub async fn post(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(post_request(uri, body, Some(TOKEN))).await
    }

    pub async fn post_anonymous(&self, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(post_request(uri, body, None)).await
    }
}

pub fn post_request(uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

// ============================================================================
// Token claims
// ============================================================================

/// Claims of a verified admin, shaped the way tokeninfo sends them
pub fn admin_claims() -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": "https://accounts.google.com",
        "azp": CLIENT_ID,
        "aud": CLIENT_ID,
        "sub": "110169484474386276334",
        "email": ADMIN_EMAIL,
        "email_verified": "true",
        "name": "Head Coach",
        "iat": (now - 60).to_string(),
        "exp": (now + 3600).to_string(),
        "alg": "RS256",
        "typ": "JWT",
    })
}

pub fn assert_cors(response: &TestResponse) {
    let headers = &response.headers;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

pub fn init_test_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,swimlog_server=debug")),
        )
        .with_test_writer()
        .try_init();
}
