//! Structural checks on a parsed document.
//!
//! Every check runs; none short-circuits another.

use super::document::{DeclaredVersion, RawDocument};
use super::errors::{ValidationError, ValidationErrors};

/// Return all structural errors found in `doc`.
///
/// - the root key must be present (`MISSING_ROOT_NODE`)
/// - a present `version` must be numeric (`UNKNOWN_VERSION`)
pub fn validate(doc: &RawDocument) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !doc.has_root() {
        errors.insert(ValidationError::missing_root_node());
    }

    if let DeclaredVersion::NotNumeric(_) = doc.version() {
        errors.insert(ValidationError::unknown_version());
    }

    errors
}
