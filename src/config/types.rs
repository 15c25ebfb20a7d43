//! Configuration types and defaults for statarun.
//!
//! This module defines the enums and constants shared by the persisted
//! config file and the settings resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which table serializer handles data exchange on modern interpreter releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Serializer {
    /// Current-format serializer (default).
    #[default]
    Primary,
    /// Older serializer limited to pre-13 dataset formats.
    LegacySecondary,
}

impl Serializer {
    /// Parse a serializer choice from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "primary" => Some(Self::Primary),
            "legacy-secondary" => Some(Self::LegacySecondary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::LegacySecondary => "legacy-secondary",
        }
    }
}

impl fmt::Display for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys accepted by `statarun config set` / `unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "stata_path",
    "stata_version",
    "echo",
    "serializer",
    "extra_args",
];

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "STATARUN_CONFIG";
