//! Atomic file writes for task
//!
//! Every write goes to a temporary file in the target's directory, is synced
//! to disk, and is then renamed over the target. Readers see either the old
//! contents or the new contents, never a partial file.
//!
//! This module does NOT lock across processes. Two processes rewriting the
//! same file can still lose each other's updates.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;

/// Atomically write data to a file
///
/// The parent directory is created if it is missing.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Temp file must live on the same filesystem for the rename to be atomic
    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(data)?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

/// Atomically write string data to a file
pub fn write_atomic_str(path: impl AsRef<Path>, data: &str) -> Result<()> {
    write_atomic(path, data.as_bytes())
}
