//! Bounded background execution for link-processing jobs.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

/// Runs submitted jobs on the tokio runtime, at most `size` at a time.
///
/// Jobs beyond the limit are spawned immediately but wait for a permit
/// before doing any work.
#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

/// Completion handle for a submitted job. Dropping it detaches the job.
pub struct TaskHandle<T> {
    inner: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    /// Waits for the job to finish.
    ///
    /// # Errors
    ///
    /// Returns the [`JoinError`] if the job panicked or was aborted.
    pub async fn join(self) -> Result<T, JoinError> {
        self.inner.await
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("finished", &self.inner.is_finished())
            .finish()
    }
}

impl WorkerPool {
    /// `size` is clamped to at least one worker.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Schedules `job` and returns without waiting for it.
    pub fn submit<F, T>(&self, job: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let inner = tokio::spawn(async move {
            // The semaphore is never closed, so acquisition only waits.
            let _permit = permits.acquire_owned().await.ok();
            job.await
        });
        TaskHandle { inner }
    }
}
