//! Configuration management
//!
//! Loaded once at startup from the environment (with `.env` support) and
//! shared read-only afterwards.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8787;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/swimlog";

pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Google's ID token introspection endpoint.
pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Default timeout for the introspection call in seconds.
pub const DEFAULT_TOKENINFO_TIMEOUT_SECS: u64 = 10;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// CORS configuration
///
/// A single origin is echoed on every response; there is no per-request
/// origin negotiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

/// OAuth verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// OAuth client id the token audience must match
    pub client_id: String,
    /// Emails allowed to perform writes
    pub admin_emails: Vec<String>,
    pub tokeninfo_url: String,
    pub tokeninfo_timeout_secs: u64,
}

impl AuthConfig {
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|admin| admin == email)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env_or("SWIMLOG_HOST", DEFAULT_SERVER_HOST),
                port: env_parse_or("SWIMLOG_PORT", DEFAULT_SERVER_PORT),
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
                max_connections: env_parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    DEFAULT_DATABASE_MAX_CONNECTIONS,
                ),
                min_connections: env_parse_or(
                    "DATABASE_MIN_CONNECTIONS",
                    DEFAULT_DATABASE_MIN_CONNECTIONS,
                ),
                connect_timeout_secs: env_parse_or(
                    "DATABASE_CONNECT_TIMEOUT",
                    DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                ),
                idle_timeout_secs: env_parse_or(
                    "DATABASE_IDLE_TIMEOUT",
                    DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
                ),
            },
            cors: CorsConfig {
                allowed_origin: env_or("CORS_ALLOWED_ORIGIN", DEFAULT_CORS_ALLOWED_ORIGIN),
            },
            auth: AuthConfig {
                client_id: env_or("GOOGLE_CLIENT_ID", ""),
                admin_emails: split_list(&env_or("ADMIN_EMAILS", "")),
                tokeninfo_url: env_or("TOKENINFO_URL", DEFAULT_TOKENINFO_URL),
                tokeninfo_timeout_secs: env_parse_or(
                    "TOKENINFO_TIMEOUT",
                    DEFAULT_TOKENINFO_TIMEOUT_SECS,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        if HeaderValue::from_str(&self.cors.allowed_origin).is_err() {
            anyhow::bail!(
                "CORS allowed origin '{}' is not a valid header value",
                self.cors.allowed_origin
            );
        }

        if self.auth.client_id.trim().is_empty() {
            anyhow::bail!("GOOGLE_CLIENT_ID must be set");
        }

        if self.auth.admin_emails.is_empty() {
            anyhow::bail!("ADMIN_EMAILS must list at least one address");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            cors: CorsConfig {
                allowed_origin: DEFAULT_CORS_ALLOWED_ORIGIN.to_string(),
            },
            auth: AuthConfig {
                client_id: String::new(),
                admin_emails: Vec::new(),
                tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
                tokeninfo_timeout_secs: DEFAULT_TOKENINFO_TIMEOUT_SECS,
            },
        }
    }
}
