//! Atomic file replacement.

use std::io;
use std::path::{Path, PathBuf};

/// Replaces `path` with `content` without ever exposing a partial file.
///
/// Writes `{path}.tmp` first, then renames it over `path`. Missing parent
/// directories are created. Runs on the blocking pool.
///
/// # Errors
///
/// Returns the underlying I/O error if any step fails.
pub async fn write_atomic(path: PathBuf, content: String) -> io::Result<()> {
    tokio::task::spawn_blocking(move || write_atomic_blocking(&path, &content))
        .await
        .map_err(io::Error::other)?
}

fn write_atomic_blocking(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Append .tmp instead of replacing extension to avoid conflicts
    // (e.g., rules.json -> rules.json.tmp, not rules.tmp)
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, path)
}
