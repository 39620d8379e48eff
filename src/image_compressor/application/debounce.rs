use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs the most recently scheduled task once `window` has passed without
/// another call to [`Debouncer::schedule`].
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task.await;
        });
        if let Some(previous) = self.pending().replace(handle) {
            previous.abort();
            debug!("Cancelled pending debounced task");
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.pending().take() {
            previous.abort();
        }
    }

    /// Waits for the pending task, if any, to run.
    pub async fn flush(&self) {
        let handle = self.pending().take();
        if let Some(handle) = handle {
            // cancellation is the normal way a pass gets superseded, only report panics
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Debounced task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_of_a_burst_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(Vec::new()));

        for value in 1..=5 {
            let fired = fired.clone();
            debouncer.schedule(async move {
                fired.lock().unwrap().push(value);
            });
            tokio::time::advance(Duration::from_millis(15)).await;
        }

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*fired.lock().unwrap(), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_runs_before_window() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(0));

        let counter = fired.clone();
        debouncer.schedule(async move {
            *counter.lock().unwrap() += 1;
        });
        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(*fired.lock().unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_run() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(0));

        for _ in 0..2 {
            let counter = fired.clone();
            debouncer.schedule(async move {
                *counter.lock().unwrap() += 1;
            });
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert_eq!(*fired.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_survives_a_panicking_task() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.schedule(async {
            panic!("debounced pass blew up");
        });
        debouncer.flush().await;

        let fired = Arc::new(Mutex::new(0));
        let counter = fired.clone();
        debouncer.schedule(async move {
            *counter.lock().unwrap() += 1;
        });
        debouncer.flush().await;
        assert_eq!(*fired.lock().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_flush() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let fired = Arc::new(Mutex::new(0));

        let counter = fired.clone();
        debouncer.schedule(async move {
            *counter.lock().unwrap() += 1;
        });
        debouncer.cancel();
        debouncer.flush().await;
        assert_eq!(*fired.lock().unwrap(), 0);

        let counter = fired.clone();
        debouncer.schedule(async move {
            *counter.lock().unwrap() += 1;
        });
        debouncer.flush().await;
        assert_eq!(*fired.lock().unwrap(), 1);
    }
}
