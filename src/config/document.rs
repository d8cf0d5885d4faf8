//! Typed view over a parsed configuration document.
//!
//! The YAML tree is converted once, right after parsing, into the two facts
//! the pipeline inspects: the declared `version` and the sub-tree under the
//! root key. Key presence is tracked separately from value nullness, so
//! `hydrabot:` with an empty value still counts as present.

use super::defaults::{ROOT_KEY, VERSION_KEY};
use serde_yaml::{Number, Value};

/// The `version` field as written by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredVersion {
    /// No `version` key, or an explicit null.
    Absent,
    /// A numeric version.
    Number(Number),
    /// Present but not numeric (string, bool, sequence, ...).
    NotNumeric(Value),
}

impl DeclaredVersion {
    fn from_field(field: Option<&Value>) -> Self {
        match field {
            None | Some(Value::Null) => DeclaredVersion::Absent,
            Some(Value::Number(n)) => DeclaredVersion::Number(n.clone()),
            Some(other) => DeclaredVersion::NotNumeric(other.clone()),
        }
    }
}

/// A parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    version: DeclaredVersion,
    root: Option<Value>,
}

impl RawDocument {
    /// Parse YAML text into a document.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self::from_value(value))
    }

    /// Build a document from an already-parsed YAML tree.
    ///
    /// A tree whose top level is not a mapping has neither a version nor a
    /// root node.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Mapping(mut map) => Self {
                version: DeclaredVersion::from_field(map.get(VERSION_KEY)),
                root: map.remove(ROOT_KEY),
            },
            _ => Self {
                version: DeclaredVersion::Absent,
                root: None,
            },
        }
    }

    pub fn version(&self) -> &DeclaredVersion {
        &self.version
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    /// Consume the document, keeping only the sub-tree under the root key.
    pub fn into_root(self) -> Option<Value> {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tracks_version_and_root() {
        let doc = RawDocument::parse("version: 1\nhydrabot:\n  approvals: 2\n").unwrap();

        assert_eq!(doc.version(), &DeclaredVersion::Number(Number::from(1)));
        assert!(doc.has_root());
    }

    #[test]
    fn test_null_root_counts_as_present() {
        let doc = RawDocument::parse("hydrabot:\n").unwrap();

        assert!(doc.has_root());
        assert_eq!(doc.root(), Some(&Value::Null));
    }

    #[test]
    fn test_null_version_is_absent() {
        let doc = RawDocument::parse("version: ~\nhydrabot: []\n").unwrap();
        assert_eq!(doc.version(), &DeclaredVersion::Absent);
    }

    #[test]
    fn test_string_version_is_not_numeric() {
        let doc = RawDocument::parse("version: not a number\n").unwrap();

        assert!(matches!(doc.version(), DeclaredVersion::NotNumeric(_)));
        assert!(!doc.has_root());
    }

    #[test]
    fn test_non_mapping_document() {
        let doc = RawDocument::parse("- just\n- a list\n").unwrap();

        assert_eq!(doc.version(), &DeclaredVersion::Absent);
        assert!(!doc.has_root());
    }

    #[test]
    fn test_malformed_yaml_fails_to_parse() {
        assert!(RawDocument::parse("hydrabot: [unclosed").is_err());
    }
}
