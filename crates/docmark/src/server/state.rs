//! Application state for the conversion server

use std::sync::Arc;

use crate::config::DocmarkConfig;
use crate::conversion::{Converter, MarkdownConverter};
use crate::processing::Dispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocmarkConfig,
    /// Admission, pool and status
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// State backed by the pdftotext / pandoc converter
    ///
    /// Starts the worker pool, so it must be called inside a Tokio runtime.
    pub fn new(config: DocmarkConfig) -> Self {
        let converter = Arc::new(MarkdownConverter::from_config(&config.conversion));
        Self::with_converter(config, converter)
    }

    pub fn with_converter(config: DocmarkConfig, converter: Arc<dyn Converter>) -> Self {
        let dispatcher = Arc::new(Dispatcher::from_config(&config.processing, converter));
        tracing::info!(
            "Application state initialized ({} workers)",
            dispatcher.pool().capacity()
        );

        Self {
            inner: Arc::new(AppStateInner { config, dispatcher }),
        }
    }

    pub fn config(&self) -> &DocmarkConfig {
        &self.inner.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.inner.dispatcher
    }

    /// Ready while the pool accepts work
    pub fn is_ready(&self) -> bool {
        !self.inner.dispatcher.pool().is_closed()
    }
}
