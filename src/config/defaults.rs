//! Fixed names, trigger patterns, and default values for configuration
//! resolution.

/// Repository-relative path of the configuration document.
///
/// Must match changed-file names exactly for a pull request to be read from
/// its head ref.
pub const FILE_NAME: &str = ".github/hydrabot.yml";

/// Name handed to the host's "resolve config by conventional name" lookup.
pub const CONVENTIONAL_NAME: &str = "hydrabot.yml";

/// Required top-level key of every configuration document.
pub const ROOT_KEY: &str = "hydrabot";

/// Top-level key selecting the schema generation.
pub const VERSION_KEY: &str = "version";

/// Comment posted by the legacy `stale` shorthand when no message is given.
pub const DEFAULT_STALE_MESSAGE: &str = "There haven't been much activity here. This is stale. Is it still relevant? This is a friendly reminder to please resolve it. 😊";

/// Catch-all trigger for issue events.
pub const ISSUES_TRIGGER: &str = "issues.*";

/// Catch-all trigger for pull request events.
pub const PULL_REQUEST_TRIGGER: &str = "pull_request.*";

/// Trigger emitted by the periodic scheduler.
pub const SCHEDULE_TRIGGER: &str = "schedule.repository";

/// Event names whose configuration may come from a pull request's head ref.
pub const PULL_REQUEST_EVENTS: &[&str] = &["pull_request", "pull_request_review"];

/// Default values injected by the legacy transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub stale: StaleDefaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleDefaults {
    pub message: &'static str,
}

/// Read-only defaults table.
pub const DEFAULTS: Defaults = Defaults {
    stale: StaleDefaults {
        message: DEFAULT_STALE_MESSAGE,
    },
};
