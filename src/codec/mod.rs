//! Dataset exchange with the interpreter.
//!
//! Encoding tables into Stata's `.dta` format and decoding them back is the
//! job of a [`TableCodec`]; the session only decides which codec runs and with
//! which format revision ([`CodecPlan`]), and where the file lives.

mod dta_file;
mod plan;

pub use dta_file::DtaFileCodec;
pub use plan::{
    CodecPlan, CodecStrategy, MODERN_TIER_MIN, PRIMARY_MAX_FORMAT, SECONDARY_MAX_FORMAT,
};

use crate::error::Result;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Free-form options forwarded untouched to the codec.
pub type CodecOptions = BTreeMap<String, String>;

/// Encoder/decoder between a host-side table and a dataset file.
pub trait TableCodec {
    type Table;

    /// Write `table` to `destination` in the given format revision.
    fn encode(
        &self,
        table: &Self::Table,
        format_revision: u32,
        options: &CodecOptions,
        destination: &Path,
    ) -> Result<()>;

    /// Read the dataset at `source`, written in the given format revision.
    fn decode(&self, source: &Path, format_revision: u32, options: &CodecOptions)
    -> Result<Self::Table>;
}

type SharedCodec<T> = Arc<dyn TableCodec<Table = T>>;

/// One codec per strategy.
pub struct CodecSet<T> {
    legacy: SharedCodec<T>,
    primary: SharedCodec<T>,
    secondary: SharedCodec<T>,
}

impl<T> CodecSet<T> {
    pub fn new(
        legacy: impl TableCodec<Table = T> + 'static,
        primary: impl TableCodec<Table = T> + 'static,
        secondary: impl TableCodec<Table = T> + 'static,
    ) -> Self {
        Self {
            legacy: Arc::new(legacy),
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
        }
    }

    /// Use the same codec for every strategy.
    pub fn uniform(codec: impl TableCodec<Table = T> + 'static) -> Self {
        let shared: SharedCodec<T> = Arc::new(codec);
        Self {
            legacy: Arc::clone(&shared),
            primary: Arc::clone(&shared),
            secondary: shared,
        }
    }

    pub fn get(&self, strategy: CodecStrategy) -> &dyn TableCodec<Table = T> {
        match strategy {
            CodecStrategy::Legacy => self.legacy.as_ref(),
            CodecStrategy::ModernPrimary => self.primary.as_ref(),
            CodecStrategy::ModernSecondary => self.secondary.as_ref(),
        }
    }
}
