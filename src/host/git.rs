//! Repository host backed by a local git checkout.
//!
//! Pull requests are registered as (base, head) revision pairs; the
//! changed-file list comes from `git diff --name-status base...head`.

use super::{ChangedFile, FileStatus, HostError, HostResult, RepositoryHost};
use crate::config::defaults::FILE_NAME;
use crate::git::run_git;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Base and head revisions of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRange {
    pub base: String,
    pub head: String,
}

#[derive(Debug, Clone)]
pub struct GitHost {
    repo: PathBuf,
    default_branch: String,
    pulls: HashMap<u64, PullRange>,
}

impl GitHost {
    pub fn new(repo: impl Into<PathBuf>, default_branch: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            default_branch: default_branch.into(),
            pulls: HashMap::new(),
        }
    }

    pub fn with_pull(mut self, number: u64, base: impl Into<String>, head: impl Into<String>) -> Self {
        self.pulls.insert(
            number,
            PullRange {
                base: base.into(),
                head: head.into(),
            },
        );
        self
    }

    /// Whether `path` exists at `git_ref`.
    async fn exists(&self, path: &str, git_ref: &str) -> HostResult<bool> {
        let output = run_git(&self.repo, &["ls-tree", "--name-only", git_ref, "--", path])
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Ok(!output.is_empty())
    }

    async fn show(&self, path: &str, git_ref: &str) -> HostResult<String> {
        let object = format!("{}:{}", git_ref, path);
        run_git(&self.repo, &["show", &object])
            .await
            .map(|output| output.stdout)
            .map_err(|e| HostError::Transport(e.to_string()))
    }
}

/// Path of a conventionally named configuration file.
fn conventional_path(name: &str) -> String {
    match FILE_NAME.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, name),
        None => name.to_string(),
    }
}

/// Parse one line of `git diff --name-status`.
///
/// Renames and copies carry a similarity score and two paths; the new path
/// is kept.
fn parse_name_status(line: &str) -> Option<ChangedFile> {
    let mut fields = line.split('\t');
    let code = fields.next()?;
    let path = fields.last()?;

    let status = match code.chars().next()? {
        'A' => FileStatus::Added,
        'M' => FileStatus::Modified,
        'D' => FileStatus::Removed,
        'R' => FileStatus::Renamed,
        'C' => FileStatus::Copied,
        'T' => FileStatus::Changed,
        _ => FileStatus::Unknown,
    };

    Some(ChangedFile::new(path.replace('\\', "/"), status))
}

#[async_trait]
impl RepositoryHost for GitHost {
    async fn fetch_default_branch_config(&self, name: &str) -> HostResult<Option<String>> {
        let path = conventional_path(name);
        if !self.exists(&path, &self.default_branch).await? {
            return Ok(None);
        }
        self.show(&path, &self.default_branch).await.map(Some)
    }

    async fn list_changed_files(&self, pull_number: u64) -> HostResult<Vec<ChangedFile>> {
        let range = self
            .pulls
            .get(&pull_number)
            .ok_or(HostError::UnknownPullRequest(pull_number))?;

        let diff_range = format!("{}...{}", range.base, range.head);
        let output = run_git(&self.repo, &["diff", "--name-status", "-M", &diff_range])
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;

        Ok(output.lines().into_iter().filter_map(parse_name_status).collect())
    }

    async fn fetch_file_at_ref(&self, path: &str, git_ref: &str) -> HostResult<String> {
        if !self.exists(path, git_ref).await? {
            return Err(HostError::NotFound {
                path: path.to_string(),
                git_ref: git_ref.to_string(),
            });
        }
        self.show(path, git_ref).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FEATURE_CONFIG, MAIN_CONFIG, create_config_repo, create_test_repo};

    #[test]
    fn test_conventional_path() {
        assert_eq!(conventional_path("hydrabot.yml"), ".github/hydrabot.yml");
    }

    #[test]
    fn test_parse_name_status() {
        assert_eq!(
            parse_name_status("M\t.github/hydrabot.yml"),
            Some(ChangedFile::new(".github/hydrabot.yml", FileStatus::Modified))
        );
        assert_eq!(
            parse_name_status("R087\told.yml\t.github/hydrabot.yml"),
            Some(ChangedFile::new(".github/hydrabot.yml", FileStatus::Renamed))
        );
        assert_eq!(
            parse_name_status("D\tREADME.md"),
            Some(ChangedFile::new("README.md", FileStatus::Removed))
        );
        assert_eq!(parse_name_status(""), None);
    }

    #[tokio::test]
    async fn test_default_branch_config() {
        let repo = create_config_repo();
        let host = GitHost::new(repo.path(), "main");

        let text = host.fetch_default_branch_config("hydrabot.yml").await.unwrap();
        assert_eq!(text.as_deref(), Some(MAIN_CONFIG));
    }

    #[tokio::test]
    async fn test_default_branch_config_absent() {
        let repo = create_test_repo();
        let host = GitHost::new(repo.path(), "main");

        assert_eq!(host.fetch_default_branch_config("hydrabot.yml").await, Ok(None));
    }

    #[tokio::test]
    async fn test_changed_files_of_pull() {
        let repo = create_config_repo();
        let host = GitHost::new(repo.path(), "main")
            .with_pull(1, "main", "edit-config")
            .with_pull(2, "main", "drop-config");

        assert_eq!(
            host.list_changed_files(1).await.unwrap(),
            vec![ChangedFile::new(FILE_NAME, FileStatus::Modified)]
        );
        assert_eq!(
            host.list_changed_files(2).await.unwrap(),
            vec![ChangedFile::new(FILE_NAME, FileStatus::Removed)]
        );
    }

    #[tokio::test]
    async fn test_unknown_pull() {
        let repo = create_test_repo();
        let host = GitHost::new(repo.path(), "main");

        assert_eq!(
            host.list_changed_files(9).await,
            Err(HostError::UnknownPullRequest(9))
        );
    }

    #[tokio::test]
    async fn test_fetch_file_at_ref() {
        let repo = create_config_repo();
        let host = GitHost::new(repo.path(), "main");

        let text = host.fetch_file_at_ref(FILE_NAME, "edit-config").await.unwrap();
        assert_eq!(text, FEATURE_CONFIG);

        let err = host.fetch_file_at_ref(FILE_NAME, "drop-config").await.unwrap_err();
        assert!(matches!(err, HostError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bad_ref_is_transport_error() {
        let repo = create_test_repo();
        let host = GitHost::new(repo.path(), "no-such-branch");

        let err = host.fetch_default_branch_config("hydrabot.yml").await.unwrap_err();
        assert!(matches!(err, HostError::Transport(_)));
    }
}
