//! Repository port and its implementations
//!
//! The `UserRepository` trait is the only way the service touches storage:
//! - One primitive per storage call, no business logic
//! - Every call takes a `CallScope` and runs under a freshly derived timeout
//! - Errors are returned as-is; nothing here retries

pub mod memory;
pub mod users;

use async_trait::async_trait;

use crate::models::User;
use crate::scope::{CallScope, ScopeError};

pub use memory::{MemoryUserRepository, RepoOp};
pub use users::PgUserRepository;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: user '{id}'")]
    NotFound { id: String },

    #[error("storage call timed out")]
    Timeout,

    #[error("storage call cancelled")]
    Cancelled,

    /// Failure raised by a non-SQL backend (the in-memory store)
    #[error("storage failure: {0}")]
    Backend(String),
}

impl From<ScopeError> for DbError {
    fn from(e: ScopeError) -> Self {
        match e {
            ScopeError::Cancelled => Self::Cancelled,
            ScopeError::DeadlineExceeded => Self::Timeout,
        }
    }
}

/// Storage operations on the `users` table.
///
/// Implementations must derive a fresh scope per call from the one passed in
/// and must not reorder rows on their own.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row. The caller assigns a unique id beforehand.
    async fn create(&self, scope: &CallScope, user: &User) -> Result<(), DbError>;

    /// At most `limit` rows starting at `offset`, in the store's natural
    /// order. Ordering is NOT guaranteed. An empty page is not an error.
    async fn get(&self, scope: &CallScope, limit: i64, offset: i64)
        -> Result<Vec<User>, DbError>;

    /// Exactly one row, or `DbError::NotFound`.
    async fn get_by_id(&self, scope: &CallScope, id: &str) -> Result<User, DbError>;

    /// Row count of the whole table, unfiltered.
    async fn count(&self, scope: &CallScope) -> Result<i64, DbError>;

    /// Overwrite name and age for `user.id`. No concurrency check.
    async fn update(&self, scope: &CallScope, user: &User) -> Result<(), DbError>;

    /// Remove the row for `id`. Succeeds when nothing matched.
    async fn delete(&self, scope: &CallScope, id: &str) -> Result<(), DbError>;
}
