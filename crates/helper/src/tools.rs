//! Tool implementations.
//!
//! Both tools answer with plain text. Filesystem problems become text too,
//! so nothing here fails across the protocol boundary.

use std::path::Path;

use chrono::Local;
use tracing::debug;

/// Returned by [`list_files`] for an empty directory.
pub const NO_FILES_FOUND: &str = "No files found.";

/// Local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
pub fn current_time() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Newline-joined entry names of `directory`, sorted by name.
pub async fn list_files(directory: impl AsRef<Path>) -> String {
    let directory = directory.as_ref();
    match read_names(directory).await {
        Ok(names) if names.is_empty() => NO_FILES_FOUND.to_string(),
        Ok(names) => names.join("\n"),
        Err(e) => {
            debug!(directory = %directory.display(), "listing failed: {e}");
            format!("Error: {}: {e}", directory.display())
        }
    }
}

async fn read_names(directory: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(directory).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
