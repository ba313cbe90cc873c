use crate::error::Result;
use crate::error_ext::ResultExt;
use crate::export::ExportedDocument;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Saves an exported document as `output_dir/filename`.
///
/// The bytes go to a temporary file in the same directory, which is flushed
/// and synced before being renamed over the destination. On any failure the
/// temporary file is removed when it drops, so a partial document is never
/// left under the final name.
pub fn deliver(document: &ExportedDocument, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory {}", output_dir.display())
    })?;

    let destination = output_dir.join(document.filename);

    let mut temp = NamedTempFile::new_in(output_dir)
        .with_context(|| format!("Failed to create temporary file in {}", output_dir.display()))?;
    temp.write_all(&document.bytes)
        .context("Failed to write export")?;
    temp.as_file_mut().sync_all().context("Failed to flush export")?;

    temp.persist(&destination)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to save {}", destination.display()))?;

    tracing::info!(
        path = %destination.display(),
        mime_type = document.mime_type,
        bytes = document.bytes.len(),
        "Delivered export"
    );

    Ok(destination)
}
