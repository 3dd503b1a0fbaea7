//! Per-file job records and outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Lifecycle state of one file's conversion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Processing,
    Completed,
    Error,
}

impl JobState {
    /// Completed and Error are final for one submission
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Queued => "Queued",
            JobState::Processing => "Processing",
            JobState::Completed => "Completed",
            JobState::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Current status of one path
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobRecord {
    pub path: PathBuf,
    #[serde(rename = "status")]
    pub state: JobState,
    pub message: String,
    #[serde(rename = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(path: PathBuf, state: JobState, message: impl Into<String>) -> Self {
        Self {
            path,
            state,
            message: message.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Terminal result of running one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(String),
    Error(String),
}

impl JobOutcome {
    pub fn state(&self) -> JobState {
        match self {
            JobOutcome::Completed(_) => JobState::Completed,
            JobOutcome::Error(_) => JobState::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            JobOutcome::Completed(message) | JobOutcome::Error(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_polling_field_names() {
        let record = JobRecord::new(PathBuf::from("a.pdf"), JobState::Queued, "Waiting to be processed");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["status"], "Queued");
        assert_eq!(value["message"], "Waiting to be processed");
        assert_eq!(value["path"], "a.pdf");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_outcome_state() {
        let ok = JobOutcome::Completed("done".into());
        assert_eq!(ok.state(), JobState::Completed);
        assert!(ok.state().is_terminal());
        assert!(ok.is_success());

        let err = JobOutcome::Error("boom".into());
        assert_eq!(err.state(), JobState::Error);
        assert_eq!(err.message(), "boom");
        assert!(!JobState::Processing.is_terminal());
    }
}
