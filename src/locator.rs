//! Document locator: decides which branch the configuration is read from.
//!
//! Events outside the pull-request categories always read the default
//! branch. A pull-request event reads the head commit only when the pull
//! request adds or modifies the configuration file itself; otherwise it
//! inherits the default-branch configuration.

use crate::config::ValidationError;
use crate::config::defaults::{CONVENTIONAL_NAME, FILE_NAME};
use crate::events::{EventContext, PullRequestRef};
use crate::host::{HostError, RepositoryHost};
use thiserror::Error;
use tracing::{debug, instrument};

/// Where a located document was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    DefaultBranch,
    /// The head commit of a pull request.
    HeadRef(String),
}

/// Configuration text and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDocument {
    pub source: DocumentSource,
    pub text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// No configuration text could be obtained.
    #[error("no configuration document found")]
    NotFound,

    /// A pull-request event arrived without its pull request.
    #[error("{0} event carries no pull request, changed files cannot be listed")]
    MissingPullRequest(String),

    #[error(transparent)]
    Remote(#[from] HostError),
}

impl LocateError {
    pub fn into_validation_error(self) -> ValidationError {
        match self {
            LocateError::NotFound => ValidationError::no_document_found(),
            err @ LocateError::MissingPullRequest(_) => ValidationError::remote_access(err),
            LocateError::Remote(err) => ValidationError::remote_access(err),
        }
    }
}

/// Locate the configuration text that applies to `ctx`.
///
/// For pull-request events the changed-file listing is awaited before any
/// content read is issued, since the second read depends on the first.
///
/// # Returns
///
/// * `Ok(LocatedDocument)` - Non-blank configuration text
/// * `Err(LocateError::NotFound)` - Nothing found, or the text is blank
/// * `Err(LocateError::MissingPullRequest)` - Pull-request event without a pull request
/// * `Err(LocateError::Remote)` - A host read failed
#[instrument(skip(host), fields(event = %ctx))]
pub async fn locate<H>(host: &H, ctx: &EventContext) -> Result<LocatedDocument, LocateError>
where
    H: RepositoryHost + ?Sized,
{
    let located = match head_ref_to_read(host, ctx).await? {
        Some(pull_request) => {
            debug!(
                pull = pull_request.number,
                git_ref = %pull_request.head_sha,
                head_ref = pull_request.head_ref.as_deref().unwrap_or("-"),
                "configuration changed in pull request, reading head"
            );
            let text = host
                .fetch_file_at_ref(FILE_NAME, &pull_request.head_sha)
                .await?;
            LocatedDocument {
                source: DocumentSource::HeadRef(pull_request.head_sha.clone()),
                text,
            }
        }
        None => {
            let text = host
                .fetch_default_branch_config(CONVENTIONAL_NAME)
                .await?
                .ok_or(LocateError::NotFound)?;
            LocatedDocument {
                source: DocumentSource::DefaultBranch,
                text,
            }
        }
    };

    if located.text.trim().is_empty() {
        return Err(LocateError::NotFound);
    }
    Ok(located)
}

/// The pull request to read from, or `None` for the default branch.
///
/// A pull-request event without a pull request cannot list its changed
/// files, so it fails instead of falling back.
async fn head_ref_to_read<'a, H>(
    host: &H,
    ctx: &'a EventContext,
) -> Result<Option<&'a PullRequestRef>, LocateError>
where
    H: RepositoryHost + ?Sized,
{
    if !ctx.is_pull_request_relevant() {
        return Ok(None);
    }

    let Some(pull_request) = &ctx.pull_request else {
        return Err(LocateError::MissingPullRequest(ctx.name()));
    };

    let changed = host.list_changed_files(pull_request.number).await?;
    let touched = changed
        .iter()
        .any(|file| file.filename == FILE_NAME && file.status.touches_content());

    Ok(touched.then_some(pull_request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErrorCode;
    use crate::host::{ChangedFile, FileStatus, HostCall, MemoryHost};

    const BASE: &str = "hydrabot:\n  - when: issues.*\n";
    const HEAD: &str = "hydrabot:\n  - when: pull_request.*\n";

    fn pr_event() -> EventContext {
        let mut pull_request = PullRequestRef::new(7, "abc123");
        pull_request.head_ref = Some("feature/labels".to_string());

        EventContext::new("pull_request")
            .with_action("opened")
            .with_pull_request(pull_request)
    }

    fn host_with_change(status: FileStatus) -> MemoryHost {
        MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(7, vec![ChangedFile::new(FILE_NAME, status)])
            .with_file(FILE_NAME, "abc123", HEAD)
    }

    #[tokio::test]
    async fn test_non_pull_request_reads_default_branch() {
        let host = host_with_change(FileStatus::Modified);
        let doc = locate(&host, &EventContext::new("issues")).await.unwrap();

        assert_eq!(doc.source, DocumentSource::DefaultBranch);
        assert_eq!(doc.text, BASE);
        assert_eq!(
            host.calls(),
            vec![HostCall::DefaultBranchConfig {
                name: CONVENTIONAL_NAME.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_modified_config_reads_head() {
        let host = host_with_change(FileStatus::Modified);
        let doc = locate(&host, &pr_event()).await.unwrap();

        assert_eq!(doc.source, DocumentSource::HeadRef("abc123".to_string()));
        assert_eq!(doc.text, HEAD);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::ChangedFiles { pull_number: 7 },
                HostCall::FileAtRef {
                    path: FILE_NAME.to_string(),
                    git_ref: "abc123".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_added_config_reads_head() {
        let host = host_with_change(FileStatus::Added);
        let doc = locate(&host, &pr_event()).await.unwrap();
        assert_eq!(doc.text, HEAD);
    }

    #[tokio::test]
    async fn test_removed_or_renamed_config_reads_default_branch() {
        for status in [FileStatus::Removed, FileStatus::Renamed] {
            let host = host_with_change(status);
            let doc = locate(&host, &pr_event()).await.unwrap();

            assert_eq!(doc.source, DocumentSource::DefaultBranch, "{:?}", status);
            assert_eq!(doc.text, BASE);
        }
    }

    #[tokio::test]
    async fn test_untouched_config_reads_default_branch() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(7, vec![ChangedFile::new("src/lib.rs", FileStatus::Modified)]);

        let doc = locate(&host, &pr_event()).await.unwrap();
        assert_eq!(doc.source, DocumentSource::DefaultBranch);
    }

    #[tokio::test]
    async fn test_path_must_match_exactly() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(
                7,
                vec![ChangedFile::new("docs/.github/hydrabot.yml", FileStatus::Modified)],
            );

        let doc = locate(&host, &pr_event()).await.unwrap();
        assert_eq!(doc.source, DocumentSource::DefaultBranch);
    }

    #[tokio::test]
    async fn test_review_events_are_pull_request_relevant() {
        let host = host_with_change(FileStatus::Modified);
        let ctx = EventContext::new("pull_request_review")
            .with_pull_request(PullRequestRef::new(7, "abc123"));

        let doc = locate(&host, &ctx).await.unwrap();
        assert_eq!(doc.text, HEAD);
    }

    #[tokio::test]
    async fn test_missing_pull_request_is_remote_error() {
        let host = host_with_change(FileStatus::Modified);
        let ctx = EventContext::new("pull_request").with_action("opened");

        let err = locate(&host, &ctx).await.unwrap_err();
        assert_eq!(
            err,
            LocateError::MissingPullRequest("pull_request.opened".to_string())
        );
        assert!(host.calls().is_empty());

        let err = err.into_validation_error();
        assert_eq!(err.code, ErrorCode::RemoteAccessError);
        assert!(err.message.contains("pull_request.opened"));
    }

    #[tokio::test]
    async fn test_listing_failure_does_not_fall_back() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .failing_changed_files(HostError::Transport("503".to_string()));

        let err = locate(&host, &pr_event()).await.unwrap_err();
        assert_eq!(err, LocateError::Remote(HostError::Transport("503".to_string())));
        assert_eq!(host.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_head_not_found_is_remote_error() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(7, vec![ChangedFile::new(FILE_NAME, FileStatus::Modified)]);

        let err = locate(&host, &pr_event()).await.unwrap_err();
        assert!(matches!(err, LocateError::Remote(HostError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_absent_or_blank_document_is_not_found() {
        let host = MemoryHost::new();
        assert_eq!(
            locate(&host, &EventContext::new("issues")).await,
            Err(LocateError::NotFound)
        );

        let host = MemoryHost::new().with_default_config("  \n");
        assert_eq!(
            locate(&host, &EventContext::new("issues")).await,
            Err(LocateError::NotFound)
        );
    }

    #[test]
    fn test_into_validation_error() {
        assert_eq!(
            LocateError::NotFound.into_validation_error().code,
            ErrorCode::NoDocumentFound
        );

        let err = LocateError::Remote(HostError::Transport("timeout".to_string()))
            .into_validation_error();
        assert_eq!(err.code, ErrorCode::RemoteAccessError);
        assert!(err.message.ends_with("request failed: timeout"));
    }
}
