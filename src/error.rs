//! Error types for statarun.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for statarun operations.
#[derive(Error, Debug)]
pub enum StataError {
    /// The command source is empty or could not be read.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A setting was supplied but its value is not acceptable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required setting was not supplied by argument, environment, or config file.
    #[error(
        "missing configuration: {name} is not set\n\
         Fix: pass it explicitly, export {env_var}, or run `statarun config set {key} <value>`."
    )]
    MissingConfiguration {
        name: &'static str,
        env_var: &'static str,
        key: &'static str,
    },

    /// The interpreter executable could not be started at all.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The captured log does not carry both output markers.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Output data was requested but the interpreter never wrote it.
    #[error("output missing: {0}")]
    OutputMissing(String),

    /// The table encoder or decoder failed.
    #[error("table codec failed: {0}")]
    Codec(String),

    /// Transient file or config file IO failed.
    #[error("{0}")]
    Io(String),
}

impl StataError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StataError::InvalidInput(_)
            | StataError::InvalidArgument(_)
            | StataError::MissingConfiguration { .. } => exit_codes::USER_ERROR,
            StataError::ExecutionFailed(_) | StataError::Io(_) => exit_codes::EXECUTION_FAILURE,
            StataError::ProtocolViolation(_)
            | StataError::OutputMissing(_)
            | StataError::Codec(_) => exit_codes::PROTOCOL_FAILURE,
        }
    }
}

/// Result type alias for statarun operations.
pub type Result<T> = std::result::Result<T, StataError>;
