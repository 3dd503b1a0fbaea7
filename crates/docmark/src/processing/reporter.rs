//! Read-only views over a status snapshot

use super::status_store::StatusSnapshot;
use crate::types::{JobRecord, JobState, StatusCounts, StatusReport};

/// Pure aggregation over snapshots
pub struct StatusReporter;

impl StatusReporter {
    pub fn aggregate(snapshot: &StatusSnapshot) -> StatusCounts {
        snapshot
            .values()
            .fold(StatusCounts::default(), |mut counts, record| {
                match record.state {
                    JobState::Queued => counts.queued += 1,
                    JobState::Processing => counts.processing += 1,
                    JobState::Completed => counts.completed += 1,
                    JobState::Error => counts.error += 1,
                }
                counts
            })
    }

    /// Newest update first; ties ordered by path so output is stable
    pub fn sorted_by_recency(snapshot: &StatusSnapshot) -> Vec<JobRecord> {
        let mut records: Vec<JobRecord> = snapshot.values().cloned().collect();
        records.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        records
    }

    pub fn report(snapshot: &StatusSnapshot) -> StatusReport {
        let counts = Self::aggregate(snapshot);
        StatusReport {
            counts,
            total: counts.total(),
            entries: Self::sorted_by_recency(snapshot),
        }
    }
}
