//! Exit code constants for the statarun CLI.
//!
//! - 0: Success
//! - 1: Usage or configuration error (bad input, bad argument, missing setting)
//! - 2: Execution failure (interpreter could not be started, transient file IO)
//! - 3: Protocol or data failure (log markers missing, no output dataset, codec error)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Bad command source, invalid argument value, or unset required setting.
pub const USER_ERROR: i32 = 1;

/// The interpreter could not be launched, or transient files could not be managed.
pub const EXECUTION_FAILURE: i32 = 2;

/// The interpreter ran but its log or output dataset could not be trusted.
pub const PROTOCOL_FAILURE: i32 = 3;
