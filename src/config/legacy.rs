//! Rewrites the flat `version: 1` schema into canonical rules.
//!
//! ```yaml
//! version: 1
//! hydrabot:
//!   issues:
//!     title: 'wip'
//!     stale:
//!       days: 20
//!   pull_requests:
//!     approvals: 2
//!     label: 'do not merge'
//! ```
//!
//! Output order: the `issues` rule, the `issues` stale rule, the
//! `pull_requests` rule, the `pull_requests` stale rule. Only keys the user
//! wrote produce validate entries; the stale comment body is the only
//! injected default.

use super::defaults::{DEFAULTS, ISSUES_TRIGGER, PULL_REQUEST_TRIGGER, SCHEDULE_TRIGGER};
use super::errors::{ValidationWarning, WarningCode};
use super::rules::{Action, CanonicalRule, PatternCheck, Validator};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_yaml::Value;

/// Shorthand keys valid at the top level and inside each area.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Section {
    approvals: Option<u32>,
    #[serde(deserialize_with = "scalar_text")]
    label: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    title: Option<String>,
    stale: Option<StaleSection>,
}

/// Read a pattern written as any YAML scalar (`label: 123`, `title: true`)
/// as its text. Sequences and mappings are rejected.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a pattern string, found {:?}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StaleSection {
    days: u32,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LegacyConfig {
    #[serde(flatten)]
    shorthand: Section,
    issues: Option<Section>,
    pull_requests: Option<Section>,
}

impl Section {
    fn has_shorthand(&self) -> bool {
        self.approvals.is_some() || self.label.is_some() || self.title.is_some()
    }

    fn is_empty(&self) -> bool {
        !self.has_shorthand() && self.stale.is_none()
    }

    fn validators(&self) -> Vec<Validator> {
        let mut validate = Vec::new();
        if let Some(count) = self.approvals {
            validate.push(Validator::min_approvals(count));
        }
        if let Some(label) = &self.label {
            validate.push(Validator::Label(PatternCheck::excluding(label.clone())));
        }
        if let Some(title) = &self.title {
            validate.push(Validator::Title(PatternCheck::excluding(title.clone())));
        }
        validate
    }

    fn shorthand_rule(&self, trigger: &str) -> Option<CanonicalRule> {
        if !self.has_shorthand() {
            return None;
        }
        let mut rule = CanonicalRule::new(trigger);
        rule.validate = self.validators();
        Some(rule)
    }
}

impl StaleSection {
    fn rule(&self) -> CanonicalRule {
        let body = self
            .message
            .clone()
            .unwrap_or_else(|| DEFAULTS.stale.message.to_string());

        let mut rule = CanonicalRule::new(SCHEDULE_TRIGGER);
        rule.validate.push(Validator::stale(self.days));
        rule.pass.push(Action::comment(body));
        rule
    }
}

/// Rules produced from a legacy document plus anything worth flagging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyTransform {
    pub rules: Vec<CanonicalRule>,
    pub warnings: Vec<ValidationWarning>,
}

/// Transform the sub-tree under the root key of a `version: 1` document.
///
/// Fails only when a key has the wrong shape (e.g. `approvals: many`).
pub fn transform(root: Value) -> Result<LegacyTransform, serde_yaml::Error> {
    let config: LegacyConfig = match root {
        Value::Null => LegacyConfig::default(),
        other => serde_yaml::from_value(other)?,
    };

    let mut out = LegacyTransform::default();

    if config.issues.is_none() && config.pull_requests.is_none() {
        // Generic shorthand: one rule per area, one repository-wide sweep.
        let shorthand = &config.shorthand;
        out.rules.extend(shorthand.shorthand_rule(ISSUES_TRIGGER));
        out.rules.extend(shorthand.shorthand_rule(PULL_REQUEST_TRIGGER));
        out.rules.extend(shorthand.stale.as_ref().map(StaleSection::rule));
        return Ok(out);
    }

    if !config.shorthand.is_empty() {
        out.warnings.push(ValidationWarning::new(
            WarningCode::IgnoredShorthand,
            "top-level approvals/label/title/stale are ignored when `issues` or `pull_requests` is present",
        ));
    }

    let areas = [
        (config.issues.as_ref(), ISSUES_TRIGGER),
        (config.pull_requests.as_ref(), PULL_REQUEST_TRIGGER),
    ];
    for (section, trigger) in areas {
        let Some(section) = section else { continue };
        out.rules.extend(section.shorthand_rule(trigger));
        out.rules.extend(section.stale.as_ref().map(StaleSection::rule));
    }

    Ok(out)
}
