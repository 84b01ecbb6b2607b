//! Keyed Request Supersession
//!
//! Views that refetch when a filter changes can race: an older, slower
//! response may land after a newer one. [`RequestSlots`] keeps at most one
//! in-flight request per logical operation key. Starting a request under a
//! key aborts whatever was still running under that key, and the aborted
//! caller gets [`ApiError::Superseded`]. Different keys never interact.

use crate::api::{ApiError, ApiResult};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

struct Slot {
    generation: u64,
    handle: AbortHandle,
}

/// Aborts the task and releases its slot once the caller stops waiting,
/// whether the request finished or the caller's future was dropped
struct SlotGuard<'a> {
    slots: &'a RequestSlots,
    key: &'a str,
    generation: u64,
    handle: AbortHandle,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.handle.abort();
        let mut slots = self.slots.lock();
        if slots.get(self.key).map(|s| s.generation) == Some(self.generation) {
            slots.remove(self.key);
        }
    }
}

/// Registry of in-flight requests keyed by operation
#[derive(Default)]
pub struct RequestSlots {
    slots: Mutex<HashMap<String, Slot>>,
    generation: AtomicU64,
}

impl RequestSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `request` as the current request for `key`, superseding any
    /// earlier one still in flight
    pub async fn run<T, F>(&self, key: &str, request: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let task = tokio::spawn(request);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let previous = self.lock().insert(
            key.to_string(),
            Slot {
                generation,
                handle: task.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            if !previous.handle.is_finished() {
                tracing::debug!(key, "Superseding in-flight request");
                previous.handle.abort();
            }
        }

        let guard = SlotGuard {
            slots: self,
            key,
            generation,
            handle: task.abort_handle(),
        };
        let outcome = task.await;
        drop(guard);

        match outcome {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ApiError::Superseded(key.to_string())),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Abort the in-flight request for `key`, if any
    pub fn cancel(&self, key: &str) -> bool {
        match self.lock().remove(key) {
            Some(slot) => {
                slot.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of keys with a request still registered
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn slow(value: u32, delay_ms: u64) -> ApiResult<u32> {
        sleep(Duration::from_millis(delay_ms)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let slots = Arc::new(RequestSlots::new());

        let first = tokio::spawn({
            let slots = slots.clone();
            async move { slots.run("scores.list", slow(1, 2_000)).await }
        });
        sleep(Duration::from_millis(50)).await;

        let second = slots.run("scores.list", slow(2, 10)).await;
        let first = first.await.unwrap();

        assert_eq!(second.unwrap(), 2);
        let err = first.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(matches!(err, ApiError::Superseded(ref key) if key == "scores.list"));
        assert_eq!(slots.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_different_keys_do_not_interfere() {
        let slots = RequestSlots::new();

        let (a, b) = tokio::join!(
            slots.run("grades.list", slow(1, 50)),
            slots.run("classes.list", slow(2, 10)),
        );
        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel() {
        let slots = Arc::new(RequestSlots::new());

        let pending = tokio::spawn({
            let slots = slots.clone();
            async move { slots.run("dashboard", slow(1, 2_000)).await }
        });
        sleep(Duration::from_millis(50)).await;

        assert!(slots.cancel("dashboard"));
        assert!(!slots.cancel("dashboard"));
        assert_eq!(
            pending.await.unwrap().unwrap_err().kind(),
            ErrorKind::Cancelled
        );
    }

    #[tokio::test]
    async fn test_dropped_caller_aborts_request() {
        let slots = RequestSlots::new();
        let completed = Arc::new(AtomicBool::new(false));

        let request = {
            let completed = completed.clone();
            async move {
                sleep(Duration::from_millis(200)).await;
                completed.store(true, Ordering::SeqCst);
                Ok::<(), ApiError>(())
            }
        };
        let waited = tokio::time::timeout(
            Duration::from_millis(20),
            slots.run("notifications.list", request),
        )
        .await;

        assert!(waited.is_err());
        assert_eq!(slots.in_flight(), 0);
        sleep(Duration::from_millis(400)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let slots = RequestSlots::new();
        let err = slots
            .run("users.me", async {
                Err::<(), _>(ApiError::Status {
                    status: 500,
                    body: "oops".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
