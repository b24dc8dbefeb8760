use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

/// Fixed-size pool for capture/recognize/translate jobs.
///
/// Jobs queue for a permit, so at most `size` of them run at once no matter
/// how many are submitted.
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            tracker: TaskTracker::new(),
            size,
        }
    }

    pub fn submit<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permits = self.permits.clone();
        self.tracker.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            job.await;
        });
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs currently holding a worker slot
    pub fn busy(&self) -> usize {
        self.size - self.permits.available_permits()
    }

    /// Stop accepting work and wait for running jobs, up to `grace`.
    /// Returns false if jobs were still running when the grace period ended.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.tracker.close();
        tokio::time::timeout(grace, self.tracker.wait()).await.is_ok()
    }
}
