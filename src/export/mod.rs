pub mod fonts;
pub mod markdown;
pub mod pdf;

use crate::error::{PhiloError, Result};
use crate::history::HistoryStore;
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

pub const SESSION_TITLE: &str = "AI Philosophy Session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Pdf,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "philosophy_session.md",
            ExportFormat::Pdf => "philosophy_session.pdf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "Markdown"),
            ExportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PhiloError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(PhiloError::InputValidation(format!(
                "unknown export format '{}' (expected markdown or pdf)",
                other
            ))),
        }
    }
}

/// What the PDF exporter does with characters its fonts cannot encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedCharPolicy {
    #[default]
    Reject,
    Substitute,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub unsupported_chars: UnsupportedCharPolicy,
}

/// A rendered document ready for delivery.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub filename: &'static str,
    pub mime_type: &'static str,
}

/// Renders the whole history, oldest entry first.
///
/// An empty history is refused: callers are expected to gate the export
/// action, and an empty document is never produced.
pub fn export(
    history: &HistoryStore,
    format: ExportFormat,
    options: &ExportOptions,
) -> Result<ExportedDocument> {
    if history.is_empty() {
        return Err(PhiloError::ExportRender(
            "nothing to export: the session history is empty".to_string(),
        ));
    }

    let bytes = match format {
        ExportFormat::Markdown => markdown::render(history.all()).into_bytes(),
        ExportFormat::Pdf => pdf::render(history.all(), options)?,
    };

    tracing::info!(
        format = %format,
        entries = history.len(),
        bytes = bytes.len(),
        "Rendered session export"
    );

    Ok(ExportedDocument {
        bytes,
        filename: format.filename(),
        mime_type: format.mime_type(),
    })
}
