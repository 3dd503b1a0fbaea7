//! Text extraction through locally installed tools
//!
//! - pdftotext (poppler-utils) for PDF
//! - pandoc for office and markup formats, emitting GitHub-flavored Markdown

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::process::Command;

use super::converter::TextExtractor;
use crate::config::ConversionConfig;
use crate::error::{Error, Result};

/// Pandoc reader name for a file extension
pub fn pandoc_input_format(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "docx" => Some("docx"),
        "pptx" => Some("pptx"),
        "odt" => Some("odt"),
        "rtf" => Some("rtf"),
        "epub" => Some("epub"),
        "html" | "htm" => Some("html"),
        _ => None,
    }
}

/// Shells out to pdftotext / pandoc
#[derive(Debug, Clone)]
pub struct ExternalExtractor {
    pdftotext_program: String,
    pandoc_program: String,
}

impl Default for ExternalExtractor {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}

impl ExternalExtractor {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            pdftotext_program: config.pdftotext_program.clone(),
            pandoc_program: config.pandoc_program.clone(),
        }
    }

    async fn run_tool(program: &str, command: &mut Command, filename: &str) -> Result<String> {
        let output = command.kill_on_drop(true).output().await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                Error::ToolUnavailable(program.to_string())
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::conversion(
                filename,
                format!("{} error: {}", program, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// `pdftotext -layout -enc UTF-8 <in> -`, text on stdout
    fn pdftotext_command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.pdftotext_program);
        command
            .args(["-layout", "-enc", "UTF-8"])
            .arg(path)
            .arg("-");
        command
    }

    async fn extract_pdf(&self, path: &Path, filename: &str) -> Result<String> {
        let mut command = self.pdftotext_command(path);
        let text = Self::run_tool(&self.pdftotext_program, &mut command, filename).await?;
        tracing::debug!("[{}] pdftotext extracted {} chars", filename, text.len());
        Ok(text)
    }

    async fn extract_with_pandoc(&self, path: &Path, filename: &str, format: &str) -> Result<String> {
        let mut command = Command::new(&self.pandoc_program);
        command
            .args(["-f", format, "-t", "gfm", "--wrap=none"])
            .arg(path);

        let text = Self::run_tool(&self.pandoc_program, &mut command, filename).await?;
        tracing::debug!("[{}] pandoc extracted {} chars", filename, text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextExtractor for ExternalExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if ext == "pdf" {
            return self.extract_pdf(path, &filename).await;
        }

        match pandoc_input_format(&ext) {
            Some(format) => self.extract_with_pandoc(path, &filename, format).await,
            None => Err(Error::UnsupportedFileType(if ext.is_empty() {
                filename
            } else {
                format!(".{}", ext)
            })),
        }
    }
}
