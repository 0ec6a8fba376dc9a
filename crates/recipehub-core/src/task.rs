//! View-scoped background work.
//!
//! Each view owns a `ViewScope`. Work spawned through it is aborted when the
//! scope is cancelled or dropped, so results for a view that is no longer
//! shown are never delivered.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use futures::future::{AbortHandle, Abortable};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Default)]
pub struct ViewScope {
    handles: Mutex<Vec<AbortHandle>>,
    cancelled: AtomicBool,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `future` on the runtime, tied to this scope.
    ///
    /// The task resolves to `None` if the scope was cancelled first. Spawning
    /// on an already cancelled scope yields a task that never runs `future`.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<Option<F::Output>>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (handle, registration) = AbortHandle::new_pair();
        {
            let mut handles = self.lock_handles();
            if self.is_cancelled() {
                handle.abort();
            }
            handles.retain(|h| !h.is_aborted());
            handles.push(handle);
        }

        let task = Abortable::new(future, registration);
        tokio::spawn(async move { task.await.ok() })
    }

    /// Abort everything spawned so far and anything spawned later.
    pub fn cancel(&self) {
        let handles = std::mem::take(&mut *self.lock_handles());
        self.cancelled.store(true, Ordering::SeqCst);
        if !handles.is_empty() {
            debug!(tasks = handles.len(), "Cancelling view tasks");
        }
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn lock_handles(&self) -> std::sync::MutexGuard<'_, Vec<AbortHandle>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
