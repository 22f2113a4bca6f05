//! HTTP server command
//!
//! Connects to PostgreSQL, ensures the users table exists, and serves the
//! `/user` API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use roster_server::db::{create_pool, migrations};
use roster_server::http::run_server;
use roster_server::AppConfig;

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ROSTER_BIND", default_value = "127.0.0.1:9999")]
    pub bind: SocketAddr,

    /// Deadline for each HTTP request, in seconds
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 10)]
    pub api_timeout_secs: u64,

    /// Page size used when a listing request omits `limit`
    #[arg(long, env = "DEFAULT_LIMIT", default_value_t = 10)]
    pub default_limit: i64,

    /// Skip creating the users table on startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl ServeArgs {
    fn into_config(self) -> AppConfig {
        AppConfig {
            database: self.database.into(),
            api_timeout_secs: self.api_timeout_secs,
            default_limit: self.default_limit,
            bind_addr: self.bind,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let skip_migrations = args.skip_migrations;
    let config = args.into_config();
    config.validate().context("Invalid configuration")?;

    tracing::info!("Starting roster server on {}", config.bind_addr);

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    if !skip_migrations {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    // Run server (blocks until shutdown)
    run_server(pool, &config).await.context("Server error")?;

    Ok(())
}
