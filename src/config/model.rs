//! Config struct definition.

use super::types::Serializer;
use serde::{Deserialize, Serialize};

/// Persisted statarun options.
///
/// This struct represents the contents of `config.yaml`. Every key is optional:
/// an absent key falls through to the built-in default, or to a
/// missing-configuration error for settings that have none.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the Stata executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stata_path: Option<String>,

    /// Stata release number (e.g. 17). Selects dataset format and save directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stata_version: Option<u32>,

    /// Whether to print the output produced by the caller's commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,

    /// Serializer used for dataset exchange on modern releases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serializer: Option<Serializer>,

    /// Extra arguments placed before the batch flag on the interpreter command line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}
