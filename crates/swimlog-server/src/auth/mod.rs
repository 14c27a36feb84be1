//! Bearer token verification against Google's tokeninfo endpoint
//!
//! Verification is a fixed sequence of short-circuiting steps:
//!
//! 1. extract the bearer token from `Authorization`
//! 2. call the introspection endpoint (`NoResponse` on transport failure)
//! 3. parse the body as JSON (`MalformedResponse`)
//! 4. check the claim shape (`MalformedResponse`, all violations reported)
//! 5. run the business checks in [`check_claims`] (`Unauthorized`, first
//!    failure wins)
//!
//! The order of the business checks decides which message a token with
//! several problems gets, so it must not be rearranged.

use axum::http::{header, HeaderMap};
use serde::Deserialize;
use std::time::Duration;
use swimlog_common::schema::{self, Field, Schema};

use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};

/// Issuers Google uses for ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

const BEARER_PREFIX: &str = "Bearer ";

/// Verified caller for the lifetime of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
}

/// Claims returned by tokeninfo after shape validation
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub email: Option<String>,
    /// Google sends this as the string "true" or "false"
    pub email_verified: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: f64,
    /// Expiry in seconds since the epoch
    pub exp: f64,
}

/// Shape the introspection payload must have
pub fn claims_schema() -> Schema {
    Schema::object(vec![
        Field::required("iss", Schema::string()),
        Field::required("aud", Schema::string()),
        Field::required("sub", Schema::string()),
        Field::optional("email", Schema::Email),
        Field::optional("email_verified", Schema::one_of(&["true", "false"])),
        Field::optional("name", Schema::string()),
        Field::optional("picture", Schema::string()),
        Field::required("iat", Schema::CoercedNumber),
        Field::required("exp", Schema::CoercedNumber),
    ])
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| ApiError::Unauthorized("No Authorization header".to_string()))
}

/// Business checks on shape-valid claims, in their fixed order
pub fn check_claims(
    claims: &TokenClaims,
    config: &AuthConfig,
    now_ms: i64,
) -> ApiResult<Principal> {
    let deny = |message: &str| Err(ApiError::Unauthorized(message.to_string()));

    if claims.aud != config.client_id {
        return deny("Incorrect Audience");
    }

    if claims.email_verified.as_deref() != Some("true") {
        return deny("Email not verified");
    }

    let Some(email) = claims.email.as_deref() else {
        return deny("No email in token");
    };

    if !GOOGLE_ISSUERS.contains(&claims.iss.as_str()) {
        return deny("Incorrect Issuer");
    }

    if claims.exp * 1000.0 <= now_ms as f64 {
        return deny("Token expired");
    }

    if !config.is_admin(email) {
        return deny("User not allowed");
    }

    Ok(Principal {
        email: email.to_string(),
    })
}

/// Verifies bearer tokens by calling the configured tokeninfo endpoint
#[derive(Clone)]
pub struct TokenVerifier {
    config: AuthConfig,
    http: reqwest::Client,
}

impl TokenVerifier {
    pub fn new(config: AuthConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.tokeninfo_timeout_secs))
            .build()?;

        Ok(Self { config, http })
    }

    /// Run the full verification chain for one request
    #[tracing::instrument(skip_all)]
    pub async fn verify(&self, headers: &HeaderMap) -> ApiResult<Principal> {
        let token = bearer_token(headers)?;
        let payload = self.introspect(token).await?;

        let claims: TokenClaims = schema::parse(&claims_schema(), &payload)
            .map_err(|e| ApiError::MalformedResponse(e.to_string()))?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        let principal = check_claims(&claims, &self.config, now_ms)?;

        tracing::info!(email = %principal.email, "Token verified");
        Ok(principal)
    }

    async fn introspect(&self, token: &str) -> ApiResult<serde_json::Value> {
        let response = self
            .http
            .get(&self.config.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::warn!(error = %e, "Token introspection failed");
                ApiError::NoResponse(format!("No response from identity provider: {}", e))
            })?;

        let body = response.bytes().await.map_err(|e| {
            ApiError::NoResponse(format!("Failed to read identity provider response: {}", e))
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            ApiError::MalformedResponse(format!("Identity provider returned invalid JSON: {}", e))
        })
    }
}
