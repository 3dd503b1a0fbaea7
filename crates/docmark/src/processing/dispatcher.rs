//! Admission: resolve, mark Queued, hand to the pool

use std::sync::Arc;

use super::job::ConversionJob;
use super::reporter::StatusReporter;
use super::status_store::{StatusSnapshot, StatusStore};
use super::worker::WorkerPool;
use crate::config::ProcessingConfig;
use crate::conversion::Converter;
use crate::error::{Error, Result};
use crate::ingestion::PathResolver;
use crate::types::{ClearResponse, JobOutcome, StatusReport, SubmitResponse};

/// Boundary operations over one store and one pool
pub struct Dispatcher {
    resolver: PathResolver,
    store: StatusStore,
    pool: Arc<WorkerPool>,
}

impl Dispatcher {
    pub fn new(resolver: PathResolver, store: StatusStore, pool: Arc<WorkerPool>) -> Self {
        Self {
            resolver,
            store,
            pool,
        }
    }

    /// Fresh store plus a pool sized from the config; must run inside a Tokio runtime
    pub fn from_config(config: &ProcessingConfig, converter: Arc<dyn Converter>) -> Self {
        let pool = WorkerPool::start(config.worker_count(), converter);
        Self::new(
            PathResolver::from_config(config),
            StatusStore::new(),
            Arc::new(pool),
        )
    }

    /// Admit a batch of raw paths
    ///
    /// Returns once every resolved path is recorded as Queued and enqueued;
    /// never waits for a conversion. Per-file failures show up in status only.
    pub fn submit<S: AsRef<str>>(&self, raw_paths: &[S]) -> Result<SubmitResponse> {
        if self.pool.is_closed() {
            return Err(Error::PoolClosed);
        }

        let resolution = self.resolver.resolve(raw_paths);

        for path in &resolution.resolved {
            let job = ConversionJob::queue(path.clone(), self.store.clone());
            if let Err(e) = self.pool.submit(job.clone()) {
                tracing::error!("Could not enqueue {}: {}", path.display(), e);
                job.record(&JobOutcome::Error(e.to_string()));
            }
        }

        tracing::info!(
            "Admitted {} files ({} entries unresolved)",
            resolution.resolved.len(),
            resolution.unresolved.len()
        );

        Ok(SubmitResponse {
            success: true,
            accepted_count: resolution.resolved.len(),
            resolved_paths: resolution.resolved,
            unresolved_paths: resolution.unresolved,
        })
    }

    /// Full current snapshot
    pub fn status(&self) -> StatusSnapshot {
        self.store.snapshot()
    }

    /// Counts plus records newest first, from one snapshot
    pub fn report(&self) -> StatusReport {
        StatusReporter::report(&self.store.snapshot())
    }

    /// Discard history; running jobs keep going and write fresh records
    pub fn clear_status(&self) -> ClearResponse {
        let cleared = self.store.clear();
        tracing::info!("Cleared {} status records", cleared);
        ClearResponse {
            success: true,
            cleared,
        }
    }

    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}
