//! The triggering event handed to the resolver.
//!
//! Only what configuration resolution needs is modeled: the event category
//! (`pull_request`, `issues`, `schedule`, ...), its action, and for
//! pull-request-shaped events the pull request number and head commit.

use crate::config::defaults::PULL_REQUEST_EVENTS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The pull request an event refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,

    /// Commit at the tip of the branch under review.
    pub head_sha: String,

    /// Branch name of the head, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_ref: Option<String>,
}

impl PullRequestRef {
    pub fn new(number: u64, head_sha: impl Into<String>) -> Self {
        Self {
            number,
            head_sha: head_sha.into(),
            head_ref: None,
        }
    }
}

/// One incoming repository event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventContext {
    /// Event category, e.g. `pull_request` or `issues`.
    pub event: String,

    /// Payload action, e.g. `opened`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestRef>,
}

impl EventContext {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            action: None,
            pull_request: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_pull_request(mut self, pull_request: PullRequestRef) -> Self {
        self.pull_request = Some(pull_request);
        self
    }

    /// Whether this category may read configuration from a pull request's
    /// head ref.
    pub fn is_pull_request_relevant(&self) -> bool {
        PULL_REQUEST_EVENTS.contains(&self.event.as_str())
    }

    /// Full event name matched against rule triggers (`issues.opened`).
    pub fn name(&self) -> String {
        match &self.action {
            Some(action) => format!("{}.{}", self.event, action),
            None => self.event.clone(),
        }
    }
}

impl fmt::Display for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
