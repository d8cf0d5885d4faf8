//! Error types for hydrabot.
//!
//! The resolution engine never surfaces these to its callers: every failure
//! is folded into a [`Configuration`](crate::config::Configuration) error set.
//! `HydrabotError` is what the binary and the git plumbing propagate with `?`.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for hydrabot operations outside the resolver boundary.
#[derive(Error, Debug)]
pub enum HydrabotError {
    /// User provided invalid arguments or input that cannot be read.
    #[error("{0}")]
    UserError(String),

    /// The configuration resolved with errors.
    #[error("configuration invalid: {0}")]
    ConfigInvalid(String),

    /// Git operation failed.
    #[error("Git operation failed: {0}")]
    GitError(String),
}

impl HydrabotError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            HydrabotError::UserError(_) => exit_codes::USER_ERROR,
            HydrabotError::ConfigInvalid(_) => exit_codes::CONFIG_INVALID,
            HydrabotError::GitError(_) => exit_codes::GIT_FAILURE,
        }
    }
}

/// Result type alias for hydrabot operations.
pub type Result<T> = std::result::Result<T, HydrabotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = HydrabotError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn config_invalid_has_correct_exit_code() {
        let err = HydrabotError::ConfigInvalid("MISSING_ROOT_NODE".to_string());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_INVALID);
    }

    #[test]
    fn git_error_has_correct_exit_code() {
        let err = HydrabotError::GitError("show failed".to_string());
        assert_eq!(err.exit_code(), exit_codes::GIT_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = HydrabotError::GitError("diff failed".to_string());
        assert_eq!(err.to_string(), "Git operation failed: diff failed");

        let err = HydrabotError::ConfigInvalid("2 errors".to_string());
        assert_eq!(err.to_string(), "configuration invalid: 2 errors");
    }
}
