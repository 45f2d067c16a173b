//! Navigation-scoped cancellation.
//!
//! Each browse/search/open call receives a [`NavigationToken`]. When the user
//! navigates away, the presentation layer cancels the token and the in-flight
//! operation bails out at its next checkpoint instead of applying a stale
//! result over a fresher screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::shared::error::{AppError, AppResult};

/// A thread-safe, cloneable cancellation flag.
///
/// Tokens are cheap to clone; all clones observe the same flag. Dropping a
/// token does not cancel it - call [`cancel`](Self::cancel) explicitly.
#[derive(Clone, Debug, Default)]
pub struct NavigationToken {
    cancelled: Arc<AtomicBool>,
}

impl NavigationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Checkpoint between pipeline stages.
    pub fn check(&self) -> AppResult<()> {
        if self.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }
}
