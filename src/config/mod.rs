//! Persisted configuration for statarun.
//!
//! This module defines the Config struct that represents `config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! per-key editing for `statarun config set`, and validation of values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::default_config_path;
pub use types::Serializer;
