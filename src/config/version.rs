//! Schema generation detection.

use super::document::{DeclaredVersion, RawDocument};
use serde::{Deserialize, Serialize};

/// Schema generation of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    /// Flat shorthand keyed by action name (`version: 1`).
    Legacy,
    /// Declarative rule list (no version, or any numeric version but 1).
    Canonical,
}

impl SchemaVersion {
    /// Classify a document. Callers run the validator first; a non-numeric
    /// version is treated as canonical here.
    pub fn detect(doc: &RawDocument) -> Self {
        match doc.version() {
            DeclaredVersion::Number(n) if n.as_f64() == Some(1.0) => SchemaVersion::Legacy,
            _ => SchemaVersion::Canonical,
        }
    }
}
