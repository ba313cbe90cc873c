use chrono::{DateTime, Local};

/// Rendered in place of a missing tag, in the terminal and in every export.
pub const UNTAGGED: &str = "untagged";

/// Minute-precision layout used for entry timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Text shown for an entry's tag wherever it is rendered.
pub fn display_tag(tag: Option<&str>) -> &str {
    tag.unwrap_or(UNTAGGED)
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// One generation interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub input: String,
    pub output: String,
    pub tag: Option<String>,
}

impl HistoryEntry {
    pub fn new(
        timestamp: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        tag: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            input: input.into(),
            output: output.into(),
            tag,
        }
    }

    /// Stamps the entry with the current local time.
    pub fn now(input: impl Into<String>, output: impl Into<String>, tag: Option<String>) -> Self {
        Self::new(format_timestamp(&Local::now()), input, output, tag)
    }

    pub fn display_tag(&self) -> &str {
        display_tag(self.tag.as_deref())
    }

    /// `"{timestamp} - {tag}"`, shared by both export formats.
    pub fn heading(&self) -> String {
        format!("{} - {}", self.timestamp, self.display_tag())
    }
}

/// Append-only record of the entries produced during one session.
///
/// Insertion order is the chronological order. Nothing is ever edited,
/// removed or reordered once appended; newest-first views are produced
/// at read time by [`HistoryStore::recent_first`].
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The caller is responsible for `entry.input` being non-empty.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn recent_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}
