//! Codec strategy selection.

use crate::config::Serializer;
use serde::Serialize;

/// Releases below this use the fixed legacy codec regardless of preference.
pub const MODERN_TIER_MIN: u32 = 7;

/// Newest dataset format the primary serializer writes.
pub const PRIMARY_MAX_FORMAT: u32 = 15;

/// Newest dataset format the legacy-secondary serializer writes.
pub const SECONDARY_MAX_FORMAT: u32 = 12;

/// Which codec implementation exchanges datasets with the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodecStrategy {
    Legacy,
    ModernPrimary,
    ModernSecondary,
}

/// Strategy plus the dataset format revision it should read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodecPlan {
    pub strategy: CodecStrategy,
    pub format_revision: u32,
}

impl CodecPlan {
    /// Choose the codec for a session from the Stata release and serializer preference.
    pub fn select(stata_version: u32, serializer: Serializer) -> Self {
        if stata_version < MODERN_TIER_MIN {
            return Self {
                strategy: CodecStrategy::Legacy,
                format_revision: stata_version,
            };
        }

        match serializer {
            Serializer::Primary => Self {
                strategy: CodecStrategy::ModernPrimary,
                format_revision: stata_version.min(PRIMARY_MAX_FORMAT),
            },
            Serializer::LegacySecondary => Self {
                strategy: CodecStrategy::ModernSecondary,
                format_revision: stata_version.min(SECONDARY_MAX_FORMAT),
            },
        }
    }
}
