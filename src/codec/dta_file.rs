//! Pass-through codec for datasets that are already `.dta` files.
//!
//! The table is the path of a dataset on disk. Encoding copies it into the
//! session; decoding moves the dataset Stata saved to a caller-chosen
//! destination. The bytes are never interpreted, so the format revision only
//! shows up in logs.

use super::{CodecOptions, TableCodec};
use crate::error::{Result, StataError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct DtaFileCodec {
    destination: Option<PathBuf>,
}

impl DtaFileCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where decoded (output) datasets are moved to.
    pub fn with_destination(path: impl Into<PathBuf>) -> Self {
        Self {
            destination: Some(path.into()),
        }
    }
}

impl TableCodec for DtaFileCodec {
    type Table = PathBuf;

    fn encode(
        &self,
        table: &PathBuf,
        format_revision: u32,
        _options: &CodecOptions,
        destination: &Path,
    ) -> Result<()> {
        tracing::debug!(
            source = %table.display(),
            format_revision,
            "copying input dataset unchanged"
        );
        std::fs::copy(table, destination).map_err(|e| {
            StataError::Codec(format!(
                "failed to copy input dataset '{}': {}",
                table.display(),
                e
            ))
        })?;
        Ok(())
    }

    fn decode(
        &self,
        source: &Path,
        format_revision: u32,
        _options: &CodecOptions,
    ) -> Result<PathBuf> {
        let destination = self.destination.as_ref().ok_or_else(|| {
            StataError::Codec("no destination configured for the output dataset".to_string())
        })?;
        tracing::debug!(
            destination = %destination.display(),
            format_revision,
            "moving output dataset unchanged"
        );
        crate::fs::move_file(source, destination)
            .map_err(|e| StataError::Codec(e.to_string()))?;
        Ok(destination.clone())
    }
}
