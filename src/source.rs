//! Command source normalization.
//!
//! A caller hands over either Stata commands inline or the path of an
//! existing do-file. Both end up as one ordered list of command lines that
//! the script synthesizer wraps.

use crate::error::{Result, StataError};
use std::path::{Path, PathBuf};

/// Where the caller's Stata commands come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSource {
    /// Command text; each entry may itself span several lines.
    Inline(Vec<String>),
    /// Path to an existing do-file whose lines are the commands.
    Script(PathBuf),
}

impl CommandSource {
    /// Classify raw caller values.
    ///
    /// A single value naming an existing file selects script mode; anything
    /// else is inline text.
    pub fn from_values<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();

        if values.is_empty() {
            return Err(StataError::InvalidInput(
                "no Stata commands given: pass command text or the path of a do-file".to_string(),
            ));
        }

        if let [only] = values.as_slice()
            && !only.contains('\n')
            && Path::new(only).is_file()
        {
            return Ok(CommandSource::Script(PathBuf::from(only)));
        }

        Ok(CommandSource::Inline(values))
    }

    /// Produce the ordered command lines.
    ///
    /// Inline entries are split on `\n` / `\r\n` and concatenated in order.
    pub fn resolve(&self) -> Result<Vec<String>> {
        match self {
            CommandSource::Inline(values) => {
                if values.is_empty() {
                    return Err(StataError::InvalidInput(
                        "inline command list is empty".to_string(),
                    ));
                }
                Ok(values
                    .iter()
                    .flat_map(|v| v.lines())
                    .map(str::to_string)
                    .collect())
            }
            CommandSource::Script(path) => {
                let content = std::fs::read(path).map_err(|e| {
                    StataError::InvalidInput(format!(
                        "failed to read do-file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                let text = String::from_utf8(content).map_err(|e| {
                    StataError::InvalidInput(format!(
                        "do-file '{}' is not valid UTF-8 (first bad byte at offset {}). \
                         Re-save it as UTF-8, e.g. with Stata's `unicode translate`.",
                        path.display(),
                        e.utf8_error().valid_up_to()
                    ))
                })?;
                Ok(text.lines().map(str::to_string).collect())
            }
        }
    }
}
