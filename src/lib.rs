//! Hydrabot configuration resolution.
//!
//! Given a repository event, [`resolver::resolve`] locates
//! `.github/hydrabot.yml` (on the default branch, or on a pull request's head
//! when the pull request edits it), validates it, and normalizes it into an
//! ordered list of canonical rules. Legacy `version: 1` documents are
//! rewritten into the same shape.

pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod git;
pub mod host;
pub mod locator;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use config::{CanonicalRule, Configuration, ErrorCode, Settings};
pub use events::EventContext;
pub use host::RepositoryHost;
pub use resolver::{Resolver, resolve};
