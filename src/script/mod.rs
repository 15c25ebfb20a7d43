//! Do-file synthesis.
//!
//! The caller's commands are wrapped into a self-contained do-file:
//!
//! ```text
//! set more off
//! use "<input>.dta", clear          (only with an input dataset)
//! capture noisily {
//! /*STATARUN-CUT-<id>*/
//! <caller commands, verbatim>
//! /*STATARUN-CUT-<id>*/
//! }
//! save "<output>.dta"               (only when output is requested)
//! exit, clear STATA
//! ```
//!
//! `capture noisily` keeps a failing command from aborting the do-file before
//! the save and exit directives run, while still printing its error.
//! `exit, clear STATA` discards in-memory changes so Stata never stops to ask.

mod sentinel;

pub use sentinel::Sentinel;

use crate::error::{Result, StataError};
use std::path::{Path, PathBuf};

/// First release whose `saveold` accepts `version(12)`.
pub const SAVEOLD_VERSION_TAG_MIN: u32 = 14;

/// How the output dataset is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDirective {
    /// `save`: the running release's native format.
    Save,
    /// `saveold`, optionally pinned to the Stata 12 format.
    SaveOld { version_12: bool },
}

impl SaveDirective {
    pub fn select(stata_version: u32, legacy_save: bool) -> Self {
        if legacy_save {
            SaveDirective::SaveOld {
                version_12: stata_version >= SAVEOLD_VERSION_TAG_MIN,
            }
        } else {
            SaveDirective::Save
        }
    }

    pub fn render(&self, path: &Path) -> String {
        match self {
            SaveDirective::Save => format!("save {}", quote_path(path)),
            SaveDirective::SaveOld { version_12: false } => {
                format!("saveold {}", quote_path(path))
            }
            SaveDirective::SaveOld { version_12: true } => {
                format!("saveold {}, version(12)", quote_path(path))
            }
        }
    }
}

/// Everything needed to render one session's do-file.
#[derive(Debug, Clone)]
pub struct ScriptPlan {
    pub commands: Vec<String>,
    pub sentinel: Sentinel,
    pub input: Option<PathBuf>,
    pub output: Option<(PathBuf, SaveDirective)>,
}

impl ScriptPlan {
    pub fn new(commands: Vec<String>, sentinel: Sentinel) -> Self {
        Self {
            commands,
            sentinel,
            input: None,
            output: None,
        }
    }

    /// Load this dataset before the caller's commands run.
    pub fn with_input(mut self, path: PathBuf) -> Self {
        self.input = Some(path);
        self
    }

    /// Save the dataset in memory to `path` after the caller's commands.
    pub fn with_output(mut self, path: PathBuf, directive: SaveDirective) -> Self {
        self.output = Some((path, directive));
        self
    }

    /// Render the do-file lines in their fixed order.
    pub fn lines(&self) -> Vec<String> {
        let marker = self.sentinel.comment_line();
        let mut lines = Vec::with_capacity(self.commands.len() + 8);

        lines.push("set more off".to_string());
        if let Some(input) = &self.input {
            lines.push(format!("use {}, clear", quote_path(input)));
        }
        lines.push("capture noisily {".to_string());
        lines.push(marker.clone());
        lines.extend(self.commands.iter().cloned());
        lines.push(marker);
        lines.push("}".to_string());
        if let Some((path, directive)) = &self.output {
            lines.push(directive.render(path));
        }
        lines.push("exit, clear STATA".to_string());

        lines
    }

    pub fn render(&self) -> String {
        let mut text = self.lines().join("\n");
        text.push('\n');
        text
    }

    /// Write the rendered do-file to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).map_err(|e| {
            StataError::Io(format!(
                "failed to write do-file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// Stata paths are double-quoted so spaces survive.
fn quote_path(path: &Path) -> String {
    format!("\"{}\"", path.display())
}
