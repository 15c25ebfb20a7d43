//! Transient files owned by one session.
//!
//! Every file a session creates (do-file, input and output datasets, logs) is
//! registered here and removed when the session ends, on success and failure
//! alike. Files live in a per-session directory created by `tempfile`, and
//! their names carry the session id, so concurrent sessions never collide.
//! Files that must live elsewhere (the Windows batch log, written next to the
//! interpreter's working directory) are registered with [`TransientFiles::track`].
//!
//! Removal is best-effort: a failed deletion is logged, never returned.

use crate::error::{Result, StataError};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// File name prefix shared by all transient files.
pub const FILE_PREFIX: &str = "statarun-";

#[derive(Debug)]
pub struct TransientFiles {
    session_id: String,
    dir_path: PathBuf,
    dir: Option<TempDir>,
    tracked: Vec<PathBuf>,
}

impl TransientFiles {
    /// Create a session directory under the system temp directory.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Create a session directory under `root`.
    pub fn create_in(root: &Path) -> Result<Self> {
        let session_id = Uuid::new_v4().simple().to_string();
        let dir = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .tempdir_in(root)
            .map_err(|e| {
                StataError::Io(format!(
                    "failed to create session directory in '{}': {}",
                    root.display(),
                    e
                ))
            })?;

        tracing::debug!(session = %session_id, dir = %dir.path().display(), "session directory created");

        Ok(Self {
            session_id,
            dir_path: dir.path().to_path_buf(),
            dir: Some(dir),
            tracked: Vec::new(),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir_path
    }

    /// Register a path `statarun-<id><suffix>` inside the session directory.
    ///
    /// The file itself is not created.
    pub fn allocate(&mut self, suffix: &str) -> PathBuf {
        let path = self
            .dir_path
            .join(format!("{}{}{}", FILE_PREFIX, self.session_id, suffix));
        self.track(path.clone());
        path
    }

    /// Register a file created outside the session directory.
    pub fn track(&mut self, path: PathBuf) {
        if !self.tracked.contains(&path) {
            self.tracked.push(path);
        }
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.tracked
    }

    /// Delete every registered file, then the session directory.
    ///
    /// Returns the number of deletions that failed. Files that are already
    /// gone do not count as failures. Calling this twice is harmless.
    pub fn release(&mut self) -> usize {
        let mut failures = 0;

        for path in self.tracked.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed transient file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    failures += 1;
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove transient file");
                }
            }
        }

        if let Some(dir) = self.dir.take()
            && let Err(e) = dir.close()
        {
            failures += 1;
            tracing::warn!(dir = %self.dir_path.display(), error = %e, "failed to remove session directory");
        }

        failures
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        self.release();
    }
}
