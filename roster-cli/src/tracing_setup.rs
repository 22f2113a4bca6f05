//! Console logging for the roster binary
//!
//! `RUST_LOG` wins when set. Otherwise the roster crates log at `info`
//! (`debug` with `--debug`), request spans from `tower_http` follow the same
//! level, and every other dependency is held at `warn`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const ROSTER_TARGETS: &[&str] = &["roster_server", "roster_cli", "tower_http"];

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    pub debug: bool,
}

/// Filter directives used when `RUST_LOG` is absent or unparsable.
pub fn default_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    let mut directives = vec!["warn".to_owned()];
    directives.extend(ROSTER_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(config.debug)))
        .map_err(|err| anyhow!("invalid log filter: {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
