//! # Request Context
//!
//! Carries the cancellation signal and deadline of one request down into
//! every store call and every task the request spawns.
//!
//! ```text
//! HTTP request ──► RequestContext::with_timeout(5s)
//!                        │
//!          ┌─────────────┼─────────────────────┐
//!          ▼             ▼                     ▼
//!   customers.get   books.decrement_stock   price tasks (child())
//!   interruptible   interruptible           ctx.is_cancelled()
//!   (lock wait)     (lock wait)
//! ```
//!
//! A context reports cancellation once its token is cancelled or its deadline
//! has passed, whichever comes first. Store calls wait for their lock through
//! [`RequestContext::interruptible`], so a request queued behind a busy store
//! gives up at its deadline instead of when the lock frees up.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{StoreError, StoreResult};

/// Cancellation token plus optional deadline.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline that is only cancelled explicitly.
    pub fn new() -> Self {
        RequestContext::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        RequestContext {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Derives a context for a sub-task: same deadline, child token.
    ///
    /// Cancelling the parent cancels the child; not the other way round.
    pub fn child(&self) -> Self {
        RequestContext {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Fires the cancellation signal.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(StoreError::Cancelled)` once the context has fired.
    pub fn check(&self) -> StoreResult<()> {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        Ok(())
    }

    /// Drives `fut` until it completes or the context fires.
    ///
    /// A context that has already fired wins over a ready future, so the
    /// result is `Cancelled` even when `fut` would not have waited.
    pub async fn interruptible<F: Future>(&self, fut: F) -> StoreResult<F::Output> {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StoreError::Cancelled),
            _ = deadline => Err(StoreError::Cancelled),
            out = fut => Ok(out),
        }
    }
}
