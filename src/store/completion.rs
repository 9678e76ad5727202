//! Checked single-shot completion
//!
//! The store collaborator delivers every result through a completion handler
//! that must fire exactly once. [`Completion`] bridges that contract onto a
//! [`tokio::sync::oneshot`] channel the core can await, and enforces
//! exactly-once resolution: a second `resolve` panics under
//! `debug_assertions` and logs an error otherwise, and a completion dropped
//! without resolving surfaces to the awaiting side as
//! [`StoreError::CompletionDropped`].
//!
//! # Example
//!
//! ```rust
//! use vitalstore::store::Completion;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let (completion, pending) = Completion::new();
//!
//! // The store resolves from wherever its work finishes
//! completion.resolve(Ok(42u32));
//!
//! assert_eq!(pending.await.unwrap(), 42);
//! # });
//! ```

use crate::error::StoreError;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::error;

/// Single-shot completion handle passed to the store
///
/// Cloneable is deliberately *not* implemented: a completion is a linear
/// token for one resolution.
pub struct Completion<T> {
    sender: Mutex<Option<oneshot::Sender<Result<T, StoreError>>>>,
}

/// Future side of a [`Completion`]
pub struct Pending<T> {
    receiver: oneshot::Receiver<Result<T, StoreError>>,
}

impl<T> Completion<T> {
    /// Create a completion and the pending future that awaits it
    pub fn new() -> (Self, Pending<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            Pending { receiver: rx },
        )
    }

    /// Resolve with success or failure
    ///
    /// The first call delivers the outcome. A second call is a contract
    /// violation by the store: it panics in debug builds and logs an error in
    /// release builds, leaving the first outcome in place.
    pub fn resolve(&self, outcome: Result<T, StoreError>) {
        let sender = self.sender.lock().take();
        match sender {
            Some(tx) => {
                // Receiver may have been dropped; delivery failure is fine
                let _ = tx.send(outcome);
            }
            None => {
                debug_assert!(false, "store resolved a completion more than once");
                error!("store resolved a completion more than once; keeping first outcome");
            }
        }
    }

    /// Whether this completion has already been resolved
    pub fn is_resolved(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl<T> Pending<T> {
    /// Await the store's resolution
    ///
    /// A store that drops its completion without resolving it yields
    /// [`StoreError::CompletionDropped`].
    pub async fn wait(self) -> Result<T, StoreError> {
        match self.receiver.await {
            Ok(outcome) => outcome,
            Err(_) => Err(StoreError::CompletionDropped),
        }
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T, StoreError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let receiver = Pin::new(&mut self.get_mut().receiver);
        receiver
            .poll(cx)
            .map(|r| r.unwrap_or(Err(StoreError::CompletionDropped)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_resolution() {
        let (completion, pending) = Completion::new();
        completion.resolve(Ok("done"));
        assert_eq!(pending.wait().await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_failure_resolution() {
        let (completion, pending) = Completion::<()>::new();
        completion.resolve(Err(StoreError::PermissionDenied("no read access".into())));
        assert!(matches!(
            pending.wait().await,
            Err(StoreError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_completion_surfaces() {
        let (completion, pending) = Completion::<u8>::new();
        drop(completion);
        assert_eq!(pending.wait().await, Err(StoreError::CompletionDropped));
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "more than once")]
    async fn test_double_resolution_panics_in_debug() {
        let (completion, _pending) = Completion::new();
        completion.resolve(Ok(1));
        completion.resolve(Ok(2));
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    async fn test_first_outcome_wins() {
        let (completion, pending) = Completion::new();
        completion.resolve(Ok(1));
        assert!(completion.is_resolved());

        // The second resolve would panic in debug; catching it keeps the
        // delivered outcome observable
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            completion.resolve(Ok(2));
        }));
        assert!(result.is_err());

        assert_eq!(pending.wait().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_resolve_after_receiver_dropped_is_silent() {
        let (completion, pending) = Completion::new();
        drop(pending);
        // Must not panic: the caller abandoning the wait is not a store bug
        completion.resolve(Ok(5));
    }
}
