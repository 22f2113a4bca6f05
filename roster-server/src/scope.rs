//! Call scopes: explicit cancellation and deadline tokens
//!
//! Every service operation receives a `CallScope` from its caller. Repository
//! calls never reuse it directly; each one derives a fresh child bounded by
//! its own budget, so per-call timeouts never accumulate across a request.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Why a scoped future did not produce its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline
#[derive(Debug, Clone)]
pub struct CallScope {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallScope {
    /// Scope with no deadline, cancelled only explicitly.
    pub fn unbounded() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Root scope that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Child sharing this deadline. Cancelling the child leaves the parent alone.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Child bounded by `budget` from now, never outliving the parent deadline.
    pub fn derive(&self, budget: Duration) -> Self {
        let local = Instant::now() + budget;
        let deadline = match self.deadline {
            Some(outer) => outer.min(local),
            None => local,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `fut` until it completes, the scope is cancelled, or the deadline passes.
    ///
    /// Cancellation wins over the deadline, which wins over a ready future.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ScopeError>
    where
        F: Future,
    {
        let expiry = async {
            match self.deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ScopeError::Cancelled),
            _ = expiry => Err(ScopeError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

impl Default for CallScope {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_within_budget() {
        let scope = CallScope::unbounded().derive(Duration::from_secs(5));
        let out = scope.run(async { 7 }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_fires() {
        let scope = CallScope::unbounded().derive(Duration::from_millis(50));
        let out = scope
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert_eq!(out, Err(ScopeError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn parent_cancel_reaches_children() {
        let root = CallScope::unbounded();
        let child = root.child();
        let grandchild = child.derive(Duration::from_secs(5));

        root.cancel();

        assert!(child.is_cancelled());
        let out = grandchild.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(ScopeError::Cancelled));
    }

    #[tokio::test]
    async fn child_cancel_does_not_reach_parent() {
        let root = CallScope::unbounded();
        let child = root.child();
        child.cancel();
        assert!(!root.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn derive_respects_outer_deadline() {
        let outer = CallScope::with_timeout(Duration::from_millis(100));
        let inner = outer.derive(Duration::from_secs(60));
        assert_eq!(inner.deadline(), outer.deadline());

        let tighter = outer.derive(Duration::from_millis(10));
        assert!(tighter.deadline() < outer.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn each_derive_gets_fresh_budget() {
        let outer = CallScope::unbounded();
        let first = outer.derive(Duration::from_millis(100));
        tokio::time::advance(Duration::from_millis(80)).await;
        let second = outer.derive(Duration::from_millis(100));

        let gap = second.deadline().unwrap() - first.deadline().unwrap();
        assert_eq!(gap, Duration::from_millis(80));
    }
}
