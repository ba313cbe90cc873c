use crate::api::{philosopher_prompt, Generator};
use crate::error::{PhiloError, Result};
use crate::export::{self, ExportFormat, ExportOptions, ExportedDocument};
use crate::history::{HistoryEntry, HistoryStore};

/// State of one interactive session.
///
/// Created when the tool starts and dropped when it exits; every command
/// receives it by reference. Nothing in it outlives the process.
#[derive(Debug, Default)]
pub struct Session {
    history: HistoryStore,
    tag: Option<String>,
    format: ExportFormat,
}

impl Session {
    pub fn new(tag: Option<String>, format: ExportFormat) -> Self {
        let mut session = Self {
            history: HistoryStore::new(),
            tag: None,
            format,
        };
        session.set_tag(tag);
        session
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// A blank tag counts as no tag.
    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
    }

    /// Runs one generation and records it.
    ///
    /// Blank input is refused before the generator is called. The entry is
    /// appended only once the generator has returned text, so a failure
    /// leaves the history exactly as it was.
    pub async fn generate<G: Generator>(
        &mut self,
        generator: &G,
        input: &str,
    ) -> Result<HistoryEntry> {
        if input.trim().is_empty() {
            return Err(PhiloError::InputValidation(
                "please enter your philosophical thoughts first".to_string(),
            ));
        }

        let output = generator.generate(&philosopher_prompt(input)).await?;

        let entry = HistoryEntry::now(input, output, self.tag.clone());
        self.history.append(entry.clone());
        tracing::debug!(entries = self.history.len(), "Appended history entry");

        Ok(entry)
    }

    pub fn export(&self, options: &ExportOptions) -> Result<ExportedDocument> {
        self.export_as(self.format, options)
    }

    pub fn export_as(
        &self,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<ExportedDocument> {
        export::export(&self.history, format, options)
    }
}
