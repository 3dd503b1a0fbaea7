//! Prepare-and-convert for one file

use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use super::cleanup::clean_markdown_content;
use super::converter::{Converter, TextExtractor};
use super::extractor::ExternalExtractor;
use crate::config::{ConversionConfig, RetryConfig};
use crate::error::{Error, Result};

/// Windows ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
const WINDOWS_LOCK_ERRORS: [i32; 2] = [32, 33];

/// Is this error caused by another process holding the file
fn is_contention(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    if cfg!(windows) {
        if let Some(code) = err.raw_os_error() {
            if WINDOWS_LOCK_ERRORS.contains(&code) {
                return true;
            }
        }
    }
    err.to_string().contains("being used by another process")
}

/// Run `operation` until it succeeds, fails for a reason other than
/// contention, or `max_attempts` is exhausted
async fn retry_on_contention<F, Fut>(retry: &RetryConfig, source: &Path, mut operation: F) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(()) => return Ok(()),
            Err(e) if is_contention(&e) && attempt < max_attempts => {
                let delay = retry.delay_after(attempt);
                tracing::warn!(
                    "'{}' is locked (attempt {}/{}), retrying in {:?}",
                    source.display(),
                    attempt,
                    max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn raw_copy(source: &Path, target: &Path) -> io::Result<()> {
    let bytes = tokio::fs::read(source).await?;
    tokio::fs::write(target, bytes).await
}

/// Converts documents to `<name>.md` next to the source
pub struct MarkdownConverter<E = ExternalExtractor> {
    extractor: E,
    retry: RetryConfig,
    clean_output: bool,
}

impl MarkdownConverter<ExternalExtractor> {
    /// Converter backed by pdftotext / pandoc
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::new(ExternalExtractor::from_config(config), config)
    }
}

impl<E: TextExtractor> MarkdownConverter<E> {
    pub fn new(extractor: E, config: &ConversionConfig) -> Self {
        Self {
            extractor,
            retry: config.retry.clone(),
            clean_output: config.clean_output,
        }
    }

    /// Convert `input`, writing to `output` or `<input>.md`
    ///
    /// Returns the success message shown to users.
    pub async fn convert_file(&self, input: &Path, output: Option<&Path>) -> Result<String> {
        if !tokio::fs::try_exists(input).await.unwrap_or(false) {
            return Err(Error::FileNotFound(input.to_path_buf()));
        }

        let resolved = tokio::fs::canonicalize(input).await?;
        let output_path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::default_output(&resolved));
        let file_name = resolved
            .file_name()
            .ok_or_else(|| Error::internal(format!("'{}' has no file name", resolved.display())))?
            .to_os_string();

        // Removed on drop, whatever the outcome
        let staging = tempfile::Builder::new().prefix("docmark-").tempdir()?;
        let staged = staging.path().join(&file_name);
        self.stage_source(&resolved, &staged).await?;

        let content = self.extractor.extract(&staged).await?;

        let header = format!(
            "# File: {}\n# Path: {}\n\n",
            file_name.to_string_lossy(),
            resolved.display()
        );
        let full = header + &content;
        let body = if self.clean_output {
            clean_markdown_content(&full)
        } else {
            full
        };

        tokio::fs::write(&output_path, body).await?;
        tracing::debug!("Wrote {}", output_path.display());

        Ok(format!("Successfully converted to: {}", output_path.display()))
    }

    /// Copy the source into the staging area so the conversion tools never
    /// hold the user's file open
    async fn stage_source(&self, source: &Path, staged: &Path) -> Result<()> {
        let copied = retry_on_contention(&self.retry, source, || async move {
            tokio::fs::copy(source, staged).await.map(|_| ())
        })
        .await;

        match copied {
            Ok(()) => Ok(()),
            Err(e) if is_contention(&e) => {
                tracing::warn!(
                    "'{}' still locked after {} attempts, trying a raw read",
                    source.display(),
                    self.retry.max_attempts
                );
                raw_copy(source, staged)
                    .await
                    .map_err(|e| Error::FileInUse(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Default output location for an input
    pub fn default_output(input: &Path) -> PathBuf {
        input.with_extension("md")
    }
}

#[async_trait]
impl<E: TextExtractor> Converter for MarkdownConverter<E> {
    async fn convert(&self, path: &Path) -> Result<String> {
        self.convert_file(path, None).await
    }
}
