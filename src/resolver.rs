//! Configuration resolver.
//!
//! Locates the configuration text for an event, then parses, validates, and
//! normalizes it. Every failure ends up in the returned [`Configuration`]'s
//! errors; resolution itself never fails.

use crate::config::Configuration;
use crate::events::EventContext;
use crate::host::RepositoryHost;
use crate::locator::{DocumentSource, locate};
use tracing::{info, instrument, warn};

/// Resolves configuration for events against one repository host.
#[derive(Debug, Clone)]
pub struct Resolver<H> {
    host: H,
}

impl<H: RepositoryHost> Resolver<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub async fn resolve(&self, ctx: &EventContext) -> Configuration {
        resolve(&self.host, ctx).await
    }
}

/// Resolve the configuration that applies to `ctx`.
///
/// Performs at most two host reads. Locator failures are terminal: the result
/// carries exactly that error and no further stage runs.
#[instrument(skip(host), fields(event = %ctx))]
pub async fn resolve<H>(host: &H, ctx: &EventContext) -> Configuration
where
    H: RepositoryHost + ?Sized,
{
    let document = match locate(host, ctx).await {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "configuration could not be located");
            return Configuration::from_error(err.into_validation_error());
        }
    };

    let configuration = Configuration::from_text(&document.text);

    let from_head = matches!(document.source, DocumentSource::HeadRef(_));
    if configuration.has_errors() {
        warn!(
            from_head,
            errors = ?configuration.errors().codes(),
            "configuration rejected"
        );
    } else {
        info!(
            from_head,
            rules = configuration.rules().len(),
            warnings = configuration.warnings().len(),
            "configuration resolved"
        );
    }

    configuration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::FILE_NAME;
    use crate::config::{CanonicalRule, ErrorCode, SchemaVersion};
    use crate::events::PullRequestRef;
    use crate::host::{ChangedFile, FileStatus, GitHost, HostError, MemoryHost};
    use crate::test_support::create_config_repo;

    const BASE: &str = "hydrabot:\n  - when: issues.opened\n    validate: []\n";
    const HEAD: &str = "version: 1\nhydrabot:\n  issues:\n    stale:\n      days: 20\n";

    fn pr_event(number: u64, sha: &str) -> EventContext {
        EventContext::new("pull_request")
            .with_action("synchronize")
            .with_pull_request(PullRequestRef::new(number, sha))
    }

    fn whens(config: &Configuration) -> Vec<&str> {
        config.rules().iter().map(|r| r.when.as_str()).collect()
    }

    #[tokio::test]
    async fn test_untouched_pull_request_matches_default_branch() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(1, vec![ChangedFile::new("README.md", FileStatus::Modified)]);

        let from_pull = resolve(&host, &pr_event(1, "f00")).await;
        let from_issue = resolve(&host, &EventContext::new("issues").with_action("opened")).await;

        assert_eq!(from_pull, from_issue);
        assert_eq!(whens(&from_pull), vec!["issues.opened"]);
    }

    #[tokio::test]
    async fn test_touched_config_uses_head_content() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(1, vec![ChangedFile::new(FILE_NAME, FileStatus::Modified)])
            .with_file(FILE_NAME, "f00", HEAD);

        let config = resolve(&host, &pr_event(1, "f00")).await;

        assert!(!config.has_errors());
        let settings = config.settings().unwrap();
        assert_eq!(settings.version, SchemaVersion::Legacy);
        assert_eq!(whens(&config), vec!["schedule.repository"]);
    }

    #[tokio::test]
    async fn test_content_fetch_failure_is_remote_access_error() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .with_changed_files(1, vec![ChangedFile::new(FILE_NAME, FileStatus::Added)])
            .failing_file_fetch(HostError::Transport("502 Bad Gateway".to_string()));

        let config = resolve(&host, &pr_event(1, "f00")).await;

        assert_eq!(config.errors().codes(), vec![ErrorCode::RemoteAccessError]);
        assert!(config.settings().is_none());
        assert!(config.errors().iter().next().unwrap().message.contains("502 Bad Gateway"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_remote_access_error() {
        let host = MemoryHost::new()
            .with_default_config(BASE)
            .failing_changed_files(HostError::Transport("rate limited".to_string()));

        let config = resolve(&host, &pr_event(1, "f00")).await;
        assert_eq!(config.errors().codes(), vec![ErrorCode::RemoteAccessError]);
    }

    #[tokio::test]
    async fn test_pull_request_event_without_pull_request_does_not_fall_back() {
        let host = MemoryHost::new().with_default_config(BASE);
        let ctx = EventContext::new("pull_request").with_action("opened");

        let config = resolve(&host, &ctx).await;

        assert_eq!(config.errors().codes(), vec![ErrorCode::RemoteAccessError]);
        assert!(config.rules().is_empty());
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_default_branch_failure_is_remote_access_error() {
        let host =
            MemoryHost::new().failing_default_config(HostError::Transport("dns".to_string()));

        let config = resolve(&host, &EventContext::new("issues")).await;
        assert_eq!(config.errors().codes(), vec![ErrorCode::RemoteAccessError]);
    }

    #[tokio::test]
    async fn test_no_document_anywhere() {
        let host = MemoryHost::new();
        let config = resolve(&host, &EventContext::new("schedule").with_action("repository")).await;

        assert_eq!(config.errors().codes(), vec![ErrorCode::NoDocumentFound]);
        assert!(config.settings().is_none());
    }

    #[tokio::test]
    async fn test_unparseable_document() {
        let host = MemoryHost::new().with_default_config("hydrabot: [unclosed\n");
        let config = resolve(&host, &EventContext::new("issues")).await;

        assert_eq!(config.errors().codes(), vec![ErrorCode::BadParse]);
    }

    #[tokio::test]
    async fn test_validation_errors_accumulate() {
        let host = MemoryHost::new().with_default_config("version: two\nother: {}\n");
        let config = resolve(&host, &EventContext::new("issues")).await;

        assert!(config.errors().has(ErrorCode::MissingRootNode));
        assert!(config.errors().has(ErrorCode::UnknownVersion));
        assert_eq!(config.errors().len(), 2);
        assert!(config.rules().is_empty());
    }

    #[tokio::test]
    async fn test_resolver_wraps_host() {
        let resolver = Resolver::new(MemoryHost::new().with_default_config(BASE));
        let config = resolver.resolve(&EventContext::new("issues")).await;

        assert_eq!(
            config.rules().first(),
            Some(&CanonicalRule::new("issues.opened"))
        );
        assert_eq!(resolver.host().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_git_host_end_to_end() {
        let repo = create_config_repo();
        let sha = crate::git::run_git(repo.path(), &["rev-parse", "edit-config"])
            .await
            .unwrap()
            .trimmed()
            .to_string();
        let host = GitHost::new(repo.path(), "main")
            .with_pull(1, "main", "edit-config")
            .with_pull(2, "main", "edit-readme")
            .with_pull(3, "main", "drop-config");

        let edited = resolve(&host, &pr_event(1, &sha)).await;
        assert_eq!(whens(&edited), vec!["pull_request.*"]);

        let readme = resolve(&host, &pr_event(2, "edit-readme")).await;
        assert_eq!(whens(&readme), vec!["issues.*"]);

        let dropped = resolve(&host, &pr_event(3, "drop-config")).await;
        assert_eq!(whens(&dropped), vec!["issues.*"]);
    }
}
