//! Job admission, bounded execution and status tracking

mod batch;
mod dispatcher;
mod job;
mod reporter;
mod status_store;
mod worker;

pub use batch::batch_convert;
pub use dispatcher::Dispatcher;
pub use job::{ConversionJob, PROCESSING_MESSAGE, QUEUED_MESSAGE};
pub use reporter::StatusReporter;
pub use status_store::{StatusSnapshot, StatusStore};
pub use worker::{PoolStats, WorkerPool};
