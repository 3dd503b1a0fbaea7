//! Fixed-capacity worker pool draining an unbounded job queue

use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::job::ConversionJob;
use crate::conversion::Converter;
use crate::error::{Error, Result};

type JobReceiver = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<ConversionJob>>>;

/// Pool statistics
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of worker tasks
    pub capacity: usize,
    /// Admitted jobs no worker has picked up yet
    pub queued: usize,
    /// Jobs currently converting
    pub active: usize,
}

#[derive(Debug, Default)]
struct Counters {
    queued: AtomicUsize,
    active: AtomicUsize,
}

/// Runs at most `capacity` conversions at once
///
/// `submit` never waits: jobs beyond capacity sit in the queue until a worker
/// frees up. Every submitted job is picked up exactly once, including jobs
/// still queued when [`WorkerPool::shutdown`] is called.
pub struct WorkerPool {
    capacity: usize,
    sender: Mutex<Option<mpsc::UnboundedSender<ConversionJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<Counters>,
}

impl WorkerPool {
    /// Spawn `capacity` workers (at least one) on the current runtime
    pub fn start(capacity: usize, converter: Arc<dyn Converter>) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver: JobReceiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let counters = Arc::new(Counters::default());

        let workers = (0..capacity)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    receiver.clone(),
                    converter.clone(),
                    counters.clone(),
                ))
            })
            .collect();

        tracing::info!("Worker pool started with {} workers", capacity);

        Self {
            capacity,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
            counters,
        }
    }

    /// Enqueue a job without waiting for a free worker
    pub fn submit(&self, job: ConversionJob) -> Result<()> {
        let sender = self.sender.lock();
        let sender = sender.as_ref().ok_or(Error::PoolClosed)?;

        self.counters.queued.fetch_add(1, Ordering::SeqCst);
        sender.send(job).map_err(|_| {
            self.counters.queued.fetch_sub(1, Ordering::SeqCst);
            Error::PoolClosed
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            queued: self.counters.queued.load(Ordering::SeqCst),
            active: self.counters.active.load(Ordering::SeqCst),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Stop admission, let workers drain the queue, then join them
    pub async fn shutdown(&self) {
        let sender = self.sender.lock().take();
        if sender.is_none() {
            return;
        }
        drop(sender);

        let workers = std::mem::take(&mut *self.workers.lock());
        tracing::info!("Shutting down worker pool, draining {} queued jobs", self.stats().queued);

        for result in join_all(workers).await {
            if let Err(e) = result {
                tracing::error!("Worker task ended abnormally: {}", e);
            }
        }
        tracing::info!("Worker pool stopped");
    }
}

async fn worker_loop(
    id: usize,
    receiver: JobReceiver,
    converter: Arc<dyn Converter>,
    counters: Arc<Counters>,
) {
    tracing::debug!("Worker {} started", id);

    loop {
        // Only one idle worker waits on the channel at a time
        let job = receiver.lock().await.recv().await;
        let Some(job) = job else { break };

        counters.queued.fetch_sub(1, Ordering::SeqCst);
        counters.active.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Worker {} picked up {}", id, job.path().display());

        job.run(converter.as_ref()).await;

        counters.active.fetch_sub(1, Ordering::SeqCst);
    }

    tracing::debug!("Worker {} exiting", id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::status_store::StatusStore;
    use crate::types::JobState;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    /// Tracks how many conversions overlap
    #[derive(Default)]
    struct Counting {
        current: AtomicUsize,
        high_water: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Converter for Counting {
        async fn convert(&self, _path: &Path) -> crate::Result<String> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("ok".to_string())
        }
    }

    fn job(store: &StatusStore, i: usize) -> ConversionJob {
        ConversionJob::queue(PathBuf::from(format!("file-{}.pdf", i)), store.clone())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bounded_by_capacity() {
        let capacity = 3;
        let converter = Arc::new(Counting::default());
        let pool = WorkerPool::start(capacity, converter.clone());
        let store = StatusStore::new();

        for i in 0..capacity * 10 {
            pool.submit(job(&store, i)).unwrap();
        }
        pool.shutdown().await;

        assert_eq!(converter.calls.load(Ordering::SeqCst), capacity * 10);
        let high_water = converter.high_water.load(Ordering::SeqCst);
        assert!(high_water >= 1 && high_water <= capacity, "high water {}", high_water);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), capacity * 10);
        assert!(snapshot.values().all(|r| r.state == JobState::Completed));
    }

    #[tokio::test]
    async fn test_submit_does_not_wait() {
        let converter = Arc::new(Counting::default());
        let pool = WorkerPool::start(1, converter.clone());
        let store = StatusStore::new();

        // Single-threaded runtime: nothing runs until this task yields
        for i in 0..5 {
            pool.submit(job(&store, i)).unwrap();
        }
        assert_eq!(
            pool.stats(),
            PoolStats {
                capacity: 1,
                queued: 5,
                active: 0
            }
        );
        assert_eq!(converter.calls.load(Ordering::SeqCst), 0);

        pool.shutdown().await;
        assert_eq!(converter.calls.load(Ordering::SeqCst), 5);
        assert_eq!(pool.stats().queued, 0);
        assert_eq!(pool.stats().active, 0);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown() {
        let pool = WorkerPool::start(2, Arc::new(Counting::default()));
        assert!(!pool.is_closed());

        pool.shutdown().await;
        assert!(pool.is_closed());

        let err = pool.submit(job(&StatusStore::new(), 0)).unwrap_err();
        assert!(matches!(err, Error::PoolClosed));

        // Second shutdown is a no-op
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_capacity_clamped() {
        let pool = WorkerPool::start(0, Arc::new(Counting::default()));
        assert_eq!(pool.capacity(), 1);
        pool.shutdown().await;
    }
}
