//! Git command runner for hydrabot.
//!
//! Provides an async wrapper around git commands with captured stdout/stderr
//! and structured error handling. All git operations should go through this
//! module.

use crate::error::{HydrabotError, Result};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output, exactly as written by git.
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Stdout with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Returns true if stdout holds only whitespace.
    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Returns non-empty stdout lines.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| !l.trim().is_empty()).collect()
    }
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(HydrabotError::GitError)` - On spawn failure or non-zero exit code
pub async fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .await
        .map_err(|e| {
            HydrabotError::GitError(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.trimmed().to_string()
        } else {
            git_output.stderr.clone()
        };

        Err(HydrabotError::GitError(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// "Not a git repository" is reported as a user error rather than a git
/// failure.
pub async fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let output = run_git(cwd, &["rev-parse", "--show-toplevel"])
        .await
        .map_err(|e| match e {
            HydrabotError::GitError(msg) if msg.contains("not a git repository") => {
                HydrabotError::UserError(
                    "not inside a git repository. Run this command from within a git repository."
                        .to_string(),
                )
            }
            other => other,
        })?;

    Ok(PathBuf::from(output.trimmed()))
}
