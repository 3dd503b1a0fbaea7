//! Error types for the conversion service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for docmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Conversion service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file is missing
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Source stayed locked after every retry and the raw copy fallback
    #[error("File is in use and cannot be accessed: {0}")]
    FileInUse(String),

    /// Text extraction failed
    #[error("Conversion failed for '{filename}': {message}")]
    Conversion { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// External conversion tool is not installed
    #[error("Conversion tool not available: {0}")]
    ToolUnavailable(String),

    /// Structurally invalid submission
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Worker pool no longer accepts jobs
    #[error("Worker pool is shut down")]
    PoolClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a conversion error
    pub fn conversion(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::FileNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::FileInUse(_) => (StatusCode::CONFLICT, "file_in_use"),
            Error::Conversion { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "conversion_error"),
            Error::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            Error::ToolUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "tool_unavailable"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::PoolClosed => (StatusCode::SERVICE_UNAVAILABLE, "pool_closed"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Toml(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
