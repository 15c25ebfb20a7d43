//! Platform differences in how Stata runs in batch mode.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// The platform family whose batch-mode conventions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// `Stata /e do file.do`; Stata also writes `file.log` into its working directory.
    Windows,
    /// `stata do file.do`; output goes to stdout/stderr only.
    Unix,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Flag that switches the interpreter into non-interactive batch execution.
    pub fn batch_flag(&self) -> Option<&'static str> {
        match self {
            Platform::Windows => Some("/e"),
            Platform::Unix => None,
        }
    }

    /// Where batch mode writes its own log for `script`, if it writes one.
    pub fn batch_log_path(&self, working_dir: &Path, script: &Path) -> Option<PathBuf> {
        match self {
            Platform::Windows => {
                let stem = script.file_stem()?;
                let mut name = stem.to_os_string();
                name.push(".log");
                Some(working_dir.join(name))
            }
            Platform::Unix => None,
        }
    }
}
