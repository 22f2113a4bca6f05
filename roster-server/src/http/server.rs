//! Axum server setup
//!
//! Server skeleton with:
//! - Open CORS (any origin, method, header)
//! - Tracing middleware
//! - Panics in handlers become 500 responses
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the pool is closed

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::AppConfig;
use crate::db::repos::PgUserRepository;
use crate::scope::CallScope;
use crate::service::UserService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: UserService,
    /// Outer deadline applied to every request
    pub api_timeout: Duration,
}

impl AppState {
    pub fn new(service: UserService, api_timeout: Duration) -> Self {
        Self {
            service,
            api_timeout,
        }
    }

    /// Root scope for one request, expiring after `api_timeout`.
    pub fn request_scope(&self) -> CallScope {
        CallScope::with_timeout(self.api_timeout)
    }
}

/// Build the application router with all routes
pub fn build_router(state: Arc<AppState>) -> Router {
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::users::router());

    with_middleware(app).with_state(state)
}

/// Layers wrapped around every route. `CatchPanicLayer` goes on first so
/// the trace layer records a recovered panic as a 500.
fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// run_server(pool, &config).await?;
/// ```
pub async fn run_server(pool: PgPool, config: &AppConfig) -> Result<(), ServerError> {
    let repo = PgUserRepository::new(pool.clone(), config.database.call_timeout());
    let service = UserService::new(Arc::new(repo), config.service());
    let state = AppState::new(service, config.api_timeout());
    let app = build_router(Arc::new(state));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        default_limit = config.default_limit,
        api_timeout_secs = config.api_timeout_secs,
        "Server listening on {}",
        config.bind_addr
    );

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
