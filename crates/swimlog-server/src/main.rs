//! Swimlog Server - Main entry point

use anyhow::Result;
use std::sync::Arc;
use swimlog_common::logging::{init_logging, LogConfig};
use tracing::info;

use swimlog_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("swimlog-server")
        .filter_directives("swimlog_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting swimlog server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    let state = api::AppState::new(config, Arc::new(db::PgExecutor::new(pool)))?;
    info!(routes = ?state.routes.keys(), "Route table ready");

    api::serve(state).await
}
