//! Shared path -> record map behind a single lock

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::{JobRecord, JobState};

/// Point-in-time copy of every tracked record
pub type StatusSnapshot = HashMap<PathBuf, JobRecord>;

#[derive(Debug, Default)]
struct Inner {
    records: StatusSnapshot,
    /// Latest admission per path. Kept across `clear` so a superseded job
    /// stays superseded.
    generations: HashMap<PathBuf, u64>,
    next_generation: u64,
}

/// Thread-safe status map
///
/// Every operation takes the lock once and releases it before returning, so
/// the lock is never held across a conversion. Clones share the same map.
///
/// Each admission of a path opens a new generation. Writes tagged with an
/// older generation are discarded, so a resubmitted path only ever moves
/// forward from its latest Queued record.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    inner: Arc<Mutex<Inner>>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `path` with a fresh one stamped now
    pub fn upsert(&self, path: &Path, state: JobState, message: impl Into<String>) {
        let record = JobRecord::new(path.to_path_buf(), state, message);
        tracing::debug!("{} -> {}", path.display(), state);
        self.inner.lock().records.insert(record.path.clone(), record);
    }

    /// Open a new generation for `path` and record it as Queued
    pub fn admit(&self, path: &Path, message: impl Into<String>) -> u64 {
        let record = JobRecord::new(path.to_path_buf(), JobState::Queued, message);
        let mut inner = self.inner.lock();
        inner.next_generation += 1;
        let generation = inner.next_generation;
        inner.generations.insert(path.to_path_buf(), generation);
        inner.records.insert(record.path.clone(), record);
        generation
    }

    /// Write only if `generation` is still the latest admission of `path`
    ///
    /// Returns false when the write was discarded.
    pub fn upsert_if_current(
        &self,
        path: &Path,
        generation: u64,
        state: JobState,
        message: impl Into<String>,
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.generations.get(path) != Some(&generation) {
            tracing::debug!(
                "Dropping stale {} for {} (generation {})",
                state,
                path.display(),
                generation
            );
            return false;
        }
        let record = JobRecord::new(path.to_path_buf(), state, message);
        inner.records.insert(record.path.clone(), record);
        tracing::debug!("{} -> {}", path.display(), state);
        true
    }

    /// Is `generation` the latest admission of `path`
    pub fn is_current(&self, path: &Path, generation: u64) -> bool {
        self.inner.lock().generations.get(path) == Some(&generation)
    }

    /// Independent copy of the whole map
    pub fn snapshot(&self) -> StatusSnapshot {
        self.inner.lock().records.clone()
    }

    /// Drop every record; returns how many were discarded
    pub fn clear(&self) -> usize {
        let discarded = std::mem::take(&mut self.inner.lock().records);
        discarded.len()
    }

    pub fn get(&self, path: &Path) -> Option<JobRecord> {
        self.inner.lock().records.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }
}
