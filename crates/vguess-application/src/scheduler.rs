//! Cancellable deferred tasks.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a task that runs once after a delay unless cancelled first.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug)]
pub struct ScheduledTask {
    cancel: CancellationToken,
    _handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawns `task` to run after `delay`.
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            task.await;
        });

        Self {
            cancel,
            _handle: handle,
        }
    }

    /// Prevents the task from running if its delay has not elapsed yet.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag_task(flag: Arc<AtomicBool>) -> impl Future<Output = ()> + Send + 'static {
        async move {
            flag.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        let ran = Arc::new(AtomicBool::new(false));
        let task = ScheduledTask::after(Duration::from_millis(4000), flag_task(ran.clone()));

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert!(!ran.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(ran.load(Ordering::SeqCst));
        drop(task);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let task = ScheduledTask::after(Duration::from_millis(100), flag_task(ran.clone()));

        task.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
