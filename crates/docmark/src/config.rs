//! Configuration for the conversion service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocmarkConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Admission and worker pool configuration
    pub processing: ProcessingConfig,
    /// Single-file conversion configuration
    pub conversion: ConversionConfig,
}

impl DocmarkConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the service unable to run
    pub fn validate(&self) -> Result<()> {
        if self.processing.supported_extensions.is_empty() {
            return Err(Error::Config(
                "processing.supported_extensions must not be empty".to_string(),
            ));
        }
        if self.conversion.retry.max_attempts == 0 {
            return Err(Error::Config(
                "conversion.retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.conversion.retry.backoff_factor < 1.0 {
            return Err(Error::Config(
                "conversion.retry.backoff_factor must be >= 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5555,
            enable_cors: true,
        }
    }
}

/// Admission and worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Fixed worker count (auto-derived from CPU count when unset or zero)
    pub workers: Option<usize>,
    /// Extensions picked up when a directory is submitted
    pub supported_extensions: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: None,
            supported_extensions: vec!["pdf".to_string(), "docx".to_string(), "pptx".to_string()],
        }
    }
}

impl ProcessingConfig {
    /// Effective worker pool capacity
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|n| *n > 0)
            .unwrap_or_else(default_worker_count)
    }
}

/// Default pool capacity for the long-running service.
///
/// Half the machine plus one core stays free for request handling and the
/// external conversion tools.
pub fn default_worker_count() -> usize {
    worker_count_for(num_cpus::get())
}

/// `max(1, floor(parallelism / 2) - 1)`
pub fn worker_count_for(parallelism: usize) -> usize {
    (parallelism / 2).saturating_sub(1).max(1)
}

/// Pool capacity for offline batch runs: every core, but never more than the work
pub fn batch_worker_count(files: usize) -> usize {
    num_cpus::get().min(files).max(1)
}

/// Single-file conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Retry policy for copying a locked source file
    pub retry: RetryConfig,
    /// Program used for PDF text extraction
    pub pdftotext_program: String,
    /// Program used for office/markup documents
    pub pandoc_program: String,
    /// Apply content cleanup rules to the generated Markdown
    pub clean_output: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            pdftotext_program: "pdftotext".to_string(),
            pandoc_program: "pandoc".to_string(),
            clean_output: true,
        }
    }
}

/// Bounded exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total copy attempts before falling back to a raw read/write
    pub max_attempts: u32,
    /// Delay after the first contended attempt
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Delay to wait after the given (1-based) failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.initial_delay_ms as f64 * self.backoff_factor.powi(exponent);
        Duration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_worker_count_formula() {
        assert_eq!(worker_count_for(0), 1);
        assert_eq!(worker_count_for(1), 1);
        assert_eq!(worker_count_for(2), 1);
        assert_eq!(worker_count_for(4), 1);
        assert_eq!(worker_count_for(5), 1);
        assert_eq!(worker_count_for(8), 3);
        assert_eq!(worker_count_for(16), 7);
    }

    #[test]
    fn test_explicit_workers_override() {
        let mut config = ProcessingConfig::default();
        config.workers = Some(6);
        assert_eq!(config.worker_count(), 6);

        config.workers = Some(0);
        assert_eq!(config.worker_count(), default_worker_count());
    }

    #[test]
    fn test_batch_worker_count_bounded_by_work() {
        assert_eq!(batch_worker_count(0), 1);
        assert_eq!(batch_worker_count(1), 1);
        assert!(batch_worker_count(10_000) <= num_cpus::get());
    }

    #[test]
    fn test_retry_delays_double() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_after(1), Duration::from_millis(500));
        assert_eq!(retry.delay_after(2), Duration::from_millis(1000));
        assert_eq!(retry.delay_after(3), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 8088\n\n[processing]\nworkers = 2").unwrap();

        let config = DocmarkConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.processing.worker_count(), 2);
        assert_eq!(config.processing.supported_extensions, vec!["pdf", "docx", "pptx"]);
        assert_eq!(config.conversion.retry.max_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = DocmarkConfig::default();
        config.conversion.retry.max_attempts = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
