//! Canonical (rule-list) documents are accepted as written.
//!
//! The sub-tree under the root key is read as a list of rules; nothing is
//! injected. `pass`, `fail` and `error` come out empty when omitted.

use super::rules::CanonicalRule;
use serde_yaml::Value;

/// Read the rule list under the root key. An empty root yields no rules.
pub fn extract(root: Value) -> Result<Vec<CanonicalRule>, serde_yaml::Error> {
    match root {
        Value::Null => Ok(Vec::new()),
        other => serde_yaml::from_value(other),
    }
}
