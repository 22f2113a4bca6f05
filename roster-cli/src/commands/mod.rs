//! Subcommand implementations

pub mod migrate;
pub mod serve;

use clap::Args;
use roster_server::DatabaseConfig;

/// Database connection flags shared by every subcommand that touches storage
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Per-call storage timeout in milliseconds
    #[arg(long, env = "DB_TIMEOUT_MS", default_value_t = 3000)]
    pub db_timeout_ms: u64,

    /// Maximum open connections in the pool
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Connections kept open while idle
    #[arg(long, env = "DB_MIN_IDLE", default_value_t = 2)]
    pub db_min_idle: u32,

    /// Maximum lifetime of a pooled connection, in seconds
    #[arg(long, env = "DB_MAX_LIFETIME_SECS", default_value_t = 300)]
    pub db_max_lifetime_secs: u64,
}

impl From<DatabaseArgs> for DatabaseConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url,
            timeout_ms: args.db_timeout_ms,
            max_connections: args.db_max_connections,
            min_idle: args.db_min_idle,
            max_lifetime_secs: args.db_max_lifetime_secs,
        }
    }
}
