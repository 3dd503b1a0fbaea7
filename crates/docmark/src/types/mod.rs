//! Core types for the conversion service

pub mod job;
pub mod response;

pub use job::{JobOutcome, JobRecord, JobState};
pub use response::{
    ClearResponse, StatusCounts, StatusReport, SubmitRequest, SubmitResponse,
};
