//! statarun: drive Stata as a batch subprocess.
//!
//! A session wraps the caller's commands in a synthesized do-file between
//! two unique marker comments, runs Stata in batch mode, and returns only
//! the log lines the caller's commands produced. Datasets travel in and out
//! through a [`codec::TableCodec`]. Every transient file a session creates
//! is removed before it returns.

pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod exit_codes;
pub mod extract;
pub mod fs;
pub mod script;
pub mod session;
pub mod settings;
pub mod source;

#[cfg(test)]
mod test_support;

pub use error::{Result, StataError};
pub use session::{RunOutcome, RunRequest, preview_script, run, run_configured};
pub use settings::{Overrides, Settings};
pub use source::CommandSource;
