//! Configuration validation and schema normalization.
//!
//! A parsed `.github/hydrabot.yml` goes through validation, schema version
//! detection, and either the legacy transformer (`version: 1`) or the
//! canonical passthrough, producing one [`Configuration`]: errors only, or
//! settings holding an ordered list of [`CanonicalRule`]s.

pub mod canonical;
pub mod defaults;
pub mod document;
pub mod errors;
pub mod field;
pub mod legacy;
mod lint;
mod model;
pub mod rules;
mod tagged;
pub mod validator;
pub mod version;


// Re-export public API
pub use defaults::{DEFAULTS, FILE_NAME};
pub use document::{DeclaredVersion, RawDocument};
pub use errors::{ErrorCode, ValidationError, ValidationErrors, ValidationWarning, WarningCode};
pub use field::Field;
pub use model::{Configuration, Settings};
pub use rules::{Action, CanonicalRule, Validator};
pub use tagged::TAG_KEY;
pub use version::SchemaVersion;
