//! File move helpers.
//!
//! Output datasets are written by Stata inside the session directory, which
//! usually lives on the system temp volume. Handing one to the caller means
//! moving it to a destination that may sit on another filesystem, where
//! `rename(2)` fails with `EXDEV` ("Invalid cross-device link"). For those
//! cases we fall back to a copy + delete strategy.

use crate::error::{Result, StataError};
use std::fs;
use std::io;
use std::path::Path;

/// Move a single file from `source` to `destination`.
///
/// - Tries `rename()` first (atomic when possible).
/// - Falls back to an atomic write to `destination` + delete of `source` on EXDEV.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StataError::Io(format!(
                "failed to create destination directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_rename(&e) => move_file_cross_device(source, destination, e),
        Err(e) => Err(StataError::Io(format!(
            "failed to move file '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}

fn move_file_cross_device(
    source: &Path,
    destination: &Path,
    original_error: io::Error,
) -> Result<()> {
    let content = fs::read(source).map_err(|e| {
        StataError::Io(format!(
            "failed to read source file '{}' for cross-device move: {} (original rename error: {})",
            source.display(),
            e,
            original_error
        ))
    })?;

    crate::fs::atomic_write(destination, &content).map_err(|e| {
        StataError::Io(format!(
            "failed to write destination file '{}' for cross-device move: {} (original rename error: {})",
            destination.display(),
            e,
            original_error
        ))
    })?;

    fs::remove_file(source).map_err(|e| {
        StataError::Io(format!(
            "moved file across devices but failed to delete source file '{}': {}",
            source.display(),
            e
        ))
    })?;

    Ok(())
}

fn is_cross_device_rename(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::CrossesDevices || err.raw_os_error() == Some(18)
}
