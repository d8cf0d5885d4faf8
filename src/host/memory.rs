//! In-memory repository host.
//!
//! Holds a default-branch configuration, changed-file lists per pull request,
//! and files per (path, ref). Head-ref files are stored base64-encoded and
//! decoded on read. Every call is recorded so callers can assert which reads
//! happened and in what order.

use super::{ChangedFile, FileContents, HostError, HostResult, RepositoryHost};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A read issued against a [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    DefaultBranchConfig { name: String },
    ChangedFiles { pull_number: u64 },
    FileAtRef { path: String, git_ref: String },
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    default_config: Option<String>,
    changed_files: HashMap<u64, Vec<ChangedFile>>,
    files: HashMap<(String, String), FileContents>,
    default_failure: Option<HostError>,
    changed_files_failure: Option<HostError>,
    file_failure: Option<HostError>,
    calls: Mutex<Vec<HostCall>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_config(mut self, text: impl Into<String>) -> Self {
        self.default_config = Some(text.into());
        self
    }

    pub fn with_changed_files(mut self, pull_number: u64, files: Vec<ChangedFile>) -> Self {
        self.changed_files.insert(pull_number, files);
        self
    }

    pub fn with_file(mut self, path: &str, git_ref: &str, text: &str) -> Self {
        self.files.insert(
            (path.to_string(), git_ref.to_string()),
            FileContents::base64(text),
        );
        self
    }

    pub fn failing_default_config(mut self, error: HostError) -> Self {
        self.default_failure = Some(error);
        self
    }

    pub fn failing_changed_files(mut self, error: HostError) -> Self {
        self.changed_files_failure = Some(error);
        self
    }

    pub fn failing_file_fetch(mut self, error: HostError) -> Self {
        self.file_failure = Some(error);
        self
    }

    /// Reads issued so far, in order.
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock_calls().clone()
    }

    fn record(&self, call: HostCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<HostCall>> {
        self.calls.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

#[async_trait]
impl RepositoryHost for MemoryHost {
    async fn fetch_default_branch_config(&self, name: &str) -> HostResult<Option<String>> {
        self.record(HostCall::DefaultBranchConfig {
            name: name.to_string(),
        });
        if let Some(err) = &self.default_failure {
            return Err(err.clone());
        }
        Ok(self.default_config.clone())
    }

    async fn list_changed_files(&self, pull_number: u64) -> HostResult<Vec<ChangedFile>> {
        self.record(HostCall::ChangedFiles { pull_number });
        if let Some(err) = &self.changed_files_failure {
            return Err(err.clone());
        }
        self.changed_files
            .get(&pull_number)
            .cloned()
            .ok_or(HostError::UnknownPullRequest(pull_number))
    }

    async fn fetch_file_at_ref(&self, path: &str, git_ref: &str) -> HostResult<String> {
        self.record(HostCall::FileAtRef {
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        if let Some(err) = &self.file_failure {
            return Err(err.clone());
        }
        self.files
            .get(&(path.to_string(), git_ref.to_string()))
            .ok_or_else(|| HostError::NotFound {
                path: path.to_string(),
                git_ref: git_ref.to_string(),
            })?
            .decode()
    }
}
