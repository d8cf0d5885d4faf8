//! Exit code constants for the hydrabot CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable input)
//! - 2: Configuration invalid (the resolved Configuration carries errors)
//! - 3: Git operation failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an input file that cannot be read.
pub const USER_ERROR: i32 = 1;

/// The configuration document resolved with one or more errors.
pub const CONFIG_INVALID: i32 = 2;

/// Git operation failure while reading repository state.
pub const GIT_FAILURE: i32 = 3;
