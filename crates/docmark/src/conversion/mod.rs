//! Single-file document to Markdown conversion
//!
//! The worker pool only sees the [`Converter`] trait. [`MarkdownConverter`] is the
//! production implementation: it stages a private copy of the source (retrying
//! while the file is locked), extracts text with external tools, prepends a
//! header, applies cleanup rules and writes `<input>.md`.

mod cleanup;
mod converter;
mod extractor;
mod markdown;

pub use cleanup::clean_markdown_content;
pub use converter::{Converter, TextExtractor};
pub use extractor::{pandoc_input_format, ExternalExtractor};
pub use markdown::MarkdownConverter;
