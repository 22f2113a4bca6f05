//! In-memory user repository
//!
//! Insertion-ordered store with the same contract as the PostgreSQL adapter.
//! Used to exercise the service and HTTP layers without a database; it can
//! also inject failures and latency per operation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DbError, UserRepository};
use crate::models::User;
use crate::scope::CallScope;

/// Repository operations, for fault and latency injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    Create,
    Get,
    GetById,
    Count,
    Update,
    Delete,
}

impl RepoOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::GetById => "get_by_id",
            Self::Count => "count",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// In-memory `UserRepository`
#[derive(Debug)]
pub struct MemoryUserRepository {
    rows: RwLock<Vec<User>>,
    timeout: Duration,
    failures: Mutex<HashSet<RepoOp>>,
    delays: Mutex<HashMap<RepoOp, Duration>>,
    last_page: Mutex<Option<(i64, i64)>>,
    cancelled: AtomicUsize,
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl MemoryUserRepository {
    pub fn new(timeout: Duration) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            timeout,
            failures: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            last_page: Mutex::new(None),
            cancelled: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `op` fail with a backend error.
    pub fn fail(&self, op: RepoOp) {
        lock(&self.failures).insert(op);
    }

    /// Stall every subsequent `op` for `delay` before touching the rows.
    pub fn delay(&self, op: RepoOp, delay: Duration) {
        lock(&self.delays).insert(op, delay);
    }

    /// `(limit, offset)` of the most recent `get` call.
    pub fn last_page_request(&self) -> Option<(i64, i64)> {
        *lock(&self.last_page)
    }

    /// Number of calls that ended because their scope was cancelled.
    pub fn cancelled_calls(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Snapshot of stored rows in insertion order.
    pub async fn rows(&self) -> Vec<User> {
        self.rows.read().await.clone()
    }

    /// Run the injected latency and failure for `op` under a fresh call scope.
    async fn enter(&self, scope: &CallScope, op: RepoOp) -> Result<(), DbError> {
        let call = scope.derive(self.timeout);
        let delay = lock(&self.delays).get(&op).copied();
        let injected = lock(&self.failures).contains(&op);

        let outcome = call
            .run(async {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
            })
            .await;

        if let Err(e) = outcome {
            let err = DbError::from(e);
            if matches!(err, DbError::Cancelled) {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
            }
            return Err(err);
        }

        if injected {
            return Err(DbError::Backend(format!("injected {} failure", op.as_str())));
        }

        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, scope: &CallScope, user: &User) -> Result<(), DbError> {
        self.enter(scope, RepoOp::Create).await?;

        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.id == user.id) {
            return Err(DbError::Backend(format!(
                "duplicate key value violates unique constraint: id '{}'",
                user.id
            )));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn get(
        &self,
        scope: &CallScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, DbError> {
        *lock(&self.last_page) = Some((limit, offset));
        self.enter(scope, RepoOp::Get).await?;

        if limit < 0 || offset < 0 {
            return Err(DbError::Backend(
                "LIMIT and OFFSET must not be negative".to_owned(),
            ));
        }

        let rows = self.rows.read().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.iter().skip(skip).take(take).cloned().collect())
    }

    async fn get_by_id(&self, scope: &CallScope, id: &str) -> Result<User, DbError> {
        self.enter(scope, RepoOp::GetById).await?;

        self.rows
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| DbError::NotFound { id: id.to_owned() })
    }

    async fn count(&self, scope: &CallScope) -> Result<i64, DbError> {
        self.enter(scope, RepoOp::Count).await?;

        let len = self.rows.read().await.len();
        Ok(i64::try_from(len).unwrap_or(i64::MAX))
    }

    async fn update(&self, scope: &CallScope, user: &User) -> Result<(), DbError> {
        self.enter(scope, RepoOp::Update).await?;

        if let Some(row) = self.rows.write().await.iter_mut().find(|u| u.id == user.id) {
            row.name = user.name.clone();
            row.age = user.age;
        }
        Ok(())
    }

    async fn delete(&self, scope: &CallScope, id: &str) -> Result<(), DbError> {
        self.enter(scope, RepoOp::Delete).await?;

        self.rows.write().await.retain(|u| u.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_owned(),
            name: name.to_owned(),
            age: 20,
        }
    }

    #[tokio::test]
    async fn pages_follow_insertion_order() {
        let repo = MemoryUserRepository::default();
        let scope = CallScope::unbounded();
        for (id, name) in [("1", "a"), ("2", "b"), ("3", "c")] {
            repo.create(&scope, &user(id, name)).await.unwrap();
        }

        let page = repo.get(&scope, 2, 1).await.unwrap();
        let ids: Vec<_> = page.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["2", "3"]);
        assert_eq!(repo.last_page_request(), Some((2, 1)));
    }

    #[tokio::test]
    async fn duplicate_id_fails() {
        let repo = MemoryUserRepository::default();
        let scope = CallScope::unbounded();
        repo.create(&scope, &user("1", "a")).await.unwrap();
        let err = repo.create(&scope, &user("1", "b")).await.unwrap_err();
        assert!(matches!(err, DbError::Backend(_)));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_silent() {
        let repo = MemoryUserRepository::default();
        repo.update(&CallScope::unbounded(), &user("ghost", "x"))
            .await
            .unwrap();
        assert!(repo.rows().await.is_empty());
    }

    #[tokio::test]
    async fn injected_failure() {
        let repo = MemoryUserRepository::default();
        repo.fail(RepoOp::Count);
        let err = repo.count(&CallScope::unbounded()).await.unwrap_err();
        assert!(matches!(err, DbError::Backend(msg) if msg.contains("count")));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out() {
        let repo = MemoryUserRepository::new(Duration::from_millis(100));
        repo.delay(RepoOp::GetById, Duration::from_secs(30));
        let err = repo
            .get_by_id(&CallScope::unbounded(), "1")
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Timeout));
    }

    #[tokio::test]
    async fn cancelled_call_is_counted() {
        let repo = MemoryUserRepository::default();
        let scope = CallScope::unbounded();
        scope.cancel();
        let err = repo.delete(&scope, "1").await.unwrap_err();
        assert!(matches!(err, DbError::Cancelled));
        assert_eq!(repo.cancelled_calls(), 1);
    }
}
