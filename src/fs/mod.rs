//! Filesystem utilities for statarun.
//!
//! Transient file bookkeeping for sessions, atomic writes for the persisted
//! config, and a cross-device-safe move for handing output datasets back.

pub mod atomic;
mod move_file;
pub mod transient;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
pub use move_file::move_file;
pub use transient::TransientFiles;
