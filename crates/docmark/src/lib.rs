//! docmark: queue-backed document to Markdown conversion
//!
//! Callers submit raw paths (files, directories, wildcard patterns). Each
//! resolved file is recorded as Queued, converted by a fixed-size worker pool
//! and tracked through Processing to Completed or Error in a shared status
//! store that can be polled at any time.

pub mod config;
pub mod conversion;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod server;
pub mod types;

pub use config::DocmarkConfig;
pub use error::{Error, Result};
pub use processing::{batch_convert, Dispatcher, StatusStore, WorkerPool};
pub use types::{JobOutcome, JobRecord, JobState};
