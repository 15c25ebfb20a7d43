//! Stata subprocess driver.
//!
//! - Command line assembly per platform (`/e` batch flag on Windows)
//! - Combined stdout/stderr capture to a transient log file
//! - Blocking wait with no timeout
//! - Uniform `capture_log()` that hides where the platform puts the log

mod executor;
mod platform;

pub use executor::{Execution, ProcessDriver};
pub use platform::Platform;
