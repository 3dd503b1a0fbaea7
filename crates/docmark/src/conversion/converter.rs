//! Collaborator traits consumed by the processing layer

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Prepares and converts one file
///
/// Implementations own their retry policy and may take arbitrarily long.
/// The returned string is the human-readable success message recorded in status.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, path: &Path) -> Result<String>;
}

/// Extracts Markdown-ish text from a document on disk
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String>;
}
