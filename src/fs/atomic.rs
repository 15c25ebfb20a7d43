//! Atomic file writes.
//!
//! Used for the persisted config file so that an interrupted
//! `statarun config set` never leaves a half-written YAML document behind.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a uniquely named temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically replace the target (`rename` on POSIX, `MoveFileEx` on Windows)
//!
//! Source and destination must be on the same filesystem for the rename to be
//! atomic, which is why the temporary file is created next to the target.

use crate::error::{Result, StataError};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| {
            StataError::Io(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp = tempfile::Builder::new()
        .prefix(".statarun-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| {
            StataError::Io(format!(
                "failed to create temporary file in '{}': {}",
                parent.display(),
                e
            ))
        })?;

    // The temporary file is removed on drop if any step below fails.
    temp.write_all(content)
        .map_err(|e| StataError::Io(format!("failed to write to temporary file: {}", e)))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StataError::Io(format!("failed to sync temporary file to disk: {}", e)))?;

    temp.persist(path).map_err(|e| {
        StataError::Io(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e.error
        ))
    })?;

    sync_dir(parent);
    Ok(())
}

/// Persist the directory entry created by the rename.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Ok(dir) = fs::File::open(dir) {
        let _ = dir.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}
