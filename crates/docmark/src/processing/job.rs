//! One file's conversion, from Queued to a terminal state

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

use super::status_store::StatusStore;
use crate::conversion::Converter;
use crate::types::{JobOutcome, JobState};

pub const QUEUED_MESSAGE: &str = "Waiting to be processed";
pub const PROCESSING_MESSAGE: &str = "Converting to Markdown...";

/// Unit of work handed to the pool
///
/// A job belongs to one admission of its path. Once the path is admitted
/// again the job is superseded: it records nothing further, and it is
/// skipped if it has not started yet.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    path: PathBuf,
    generation: u64,
    store: StatusStore,
}

impl ConversionJob {
    /// Record `path` as Queued and create the job for this admission
    ///
    /// Done at admission, before the pool sees the job.
    pub fn queue(path: PathBuf, store: StatusStore) -> Self {
        let generation = store.admit(&path, QUEUED_MESSAGE);
        Self {
            path,
            generation,
            store,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record a terminal outcome decided outside `run`
    ///
    /// Returns false when a newer admission owns the record.
    pub fn record(&self, outcome: &JobOutcome) -> bool {
        self.store.upsert_if_current(
            &self.path,
            self.generation,
            outcome.state(),
            outcome.message(),
        )
    }

    /// Convert the file and record exactly one terminal state
    ///
    /// Declared failures and panics inside the converter both end up as
    /// [`JobOutcome::Error`]. Returns `None` without converting when the
    /// path was resubmitted before this job started.
    pub async fn run(&self, converter: &dyn Converter) -> Option<JobOutcome> {
        if !self.store.upsert_if_current(
            &self.path,
            self.generation,
            JobState::Processing,
            PROCESSING_MESSAGE,
        ) {
            tracing::debug!("Skipping superseded job for {}", self.path.display());
            return None;
        }

        let outcome = match AssertUnwindSafe(converter.convert(&self.path))
            .catch_unwind()
            .await
        {
            Ok(Ok(message)) => {
                tracing::info!("Converted {}", self.path.display());
                JobOutcome::Completed(message)
            }
            Ok(Err(e)) => {
                tracing::error!("Failed to convert {}: {}", self.path.display(), e);
                JobOutcome::Error(e.to_string())
            }
            Err(payload) => {
                let fault = panic_message(payload.as_ref());
                tracing::error!("Converter panicked on {}: {}", self.path.display(), fault);
                JobOutcome::Error(format!("Error: {}", fault))
            }
        };

        if !self.record(&outcome) {
            tracing::debug!(
                "{} was resubmitted during conversion, result not recorded",
                self.path.display()
            );
        }
        Some(outcome)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault".to_string()
    }
}
