//! Request and response shapes for the polling boundary

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::job::JobRecord;

/// Batch of raw user-supplied paths
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub paths: Vec<String>,
}

/// Result of admitting a batch
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub accepted_count: usize,
    pub resolved_paths: Vec<PathBuf>,
    /// Entries that matched nothing (never tracked in status)
    pub unresolved_paths: Vec<String>,
}

/// Number of records per state
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub error: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.queued + self.processing + self.completed + self.error
    }

    /// No queued or processing records remain
    pub fn is_settled(&self) -> bool {
        self.queued == 0 && self.processing == 0
    }
}

/// Aggregated view over one snapshot
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub counts: StatusCounts,
    pub total: usize,
    /// Newest first
    pub entries: Vec<JobRecord>,
}

/// Acknowledgement for a status clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub cleared: usize,
}
