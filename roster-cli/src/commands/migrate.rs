//! Schema command: create the users table and exit

use anyhow::{Context, Result};
use clap::Parser;

use roster_server::db::{create_pool, migrations};
use roster_server::DatabaseConfig;

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let config = DatabaseConfig::from(args.database);

    let pool = create_pool(&config)
        .await
        .context("Failed to create database pool")?;
    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;
    pool.close().await;

    println!("users table ready");
    Ok(())
}
