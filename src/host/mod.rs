//! The repository-hosting collaborator.
//!
//! Configuration resolution needs three reads from the host:
//! - the configuration file on the default branch, by conventional name
//! - the files changed by a pull request
//! - a file's content at a given commit
//!
//! All reads are async and may fail with a [`HostError`]. An in-memory fake
//! is provided in [`memory`]; [`git`] reads from a local checkout.

pub mod git;
pub mod memory;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::git::GitHost;
pub use memory::{HostCall, MemoryHost};

/// Failure of a remote read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The path does not exist at the requested ref.
    #[error("{path} not found at {git_ref}")]
    NotFound { path: String, git_ref: String },

    /// The host does not know the pull request.
    #[error("pull request #{0} not found")]
    UnknownPullRequest(u64),

    /// The request itself failed (network, API, subprocess).
    #[error("request failed: {0}")]
    Transport(String),

    /// Content came back in a form that cannot be decoded to text.
    #[error("cannot decode content: {0}")]
    Decode(String),
}

/// Result type for host reads.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Status of a file in a pull request's diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

impl FileStatus {
    /// Whether the file's content at the head ref is new or edited.
    ///
    /// Renamed and copied files do not count.
    pub fn touches_content(&self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Modified)
    }
}

/// One entry of a pull request's changed-file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    /// Repository-relative path (forward slashes) at the head ref.
    pub filename: String,
    pub status: FileStatus,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
        }
    }
}

/// File content as served by a contents API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContents {
    /// `base64`, `utf-8`, or empty for raw text.
    #[serde(default)]
    pub encoding: String,
    pub content: String,
}

impl FileContents {
    /// Encode text the way the hosting API serves it.
    pub fn base64(text: &str) -> Self {
        Self {
            encoding: "base64".to_string(),
            content: STANDARD.encode(text),
        }
    }

    /// Decode to UTF-8 text. Base64 content may be line-wrapped.
    pub fn decode(&self) -> HostResult<String> {
        match self.encoding.as_str() {
            "base64" => {
                let compact: String = self
                    .content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD
                    .decode(compact)
                    .map_err(|e| HostError::Decode(e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| HostError::Decode(e.to_string()))
            }
            "" | "utf-8" | "utf8" => Ok(self.content.clone()),
            other => Err(HostError::Decode(format!("unsupported encoding '{}'", other))),
        }
    }
}

/// Reads configuration resolution needs from the repository host.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Text of the configuration file named `name` on the default branch,
    /// or `None` when it does not exist.
    async fn fetch_default_branch_config(&self, name: &str) -> HostResult<Option<String>>;

    /// Files changed between a pull request's base and head.
    async fn list_changed_files(&self, pull_number: u64) -> HostResult<Vec<ChangedFile>>;

    /// Decoded text of `path` at `git_ref`; `HostError::NotFound` when the
    /// path does not exist there.
    async fn fetch_file_at_ref(&self, path: &str, git_ref: &str) -> HostResult<String>;
}
