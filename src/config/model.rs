//! The resolved outcome of one resolution attempt.

use super::canonical;
use super::document::RawDocument;
use super::errors::{ValidationError, ValidationErrors, ValidationWarning};
use super::legacy;
use super::lint::lint;
use super::rules::CanonicalRule;
use super::validator;
use super::version::SchemaVersion;
use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

/// Normalized rules and the schema generation they were written in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub version: SchemaVersion,
    pub rules: Vec<CanonicalRule>,
}

impl Settings {
    /// Rules whose `when` matches a concrete event name, in order.
    pub fn rules_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a CanonicalRule> {
        self.rules.iter().filter(move |rule| rule.matches(event))
    }
}

/// Either one-or-more errors and no settings, or zero errors and settings.
///
/// Warnings may accompany settings; they never replace them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    errors: ValidationErrors,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<ValidationWarning>,

    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<Settings>,
}

impl Configuration {
    /// A configuration carrying a single error.
    pub fn from_error(error: ValidationError) -> Self {
        Self::from_errors(error.into())
    }

    fn from_errors(errors: ValidationErrors) -> Self {
        debug_assert!(!errors.is_empty());
        Self {
            errors,
            warnings: Vec::new(),
            settings: None,
        }
    }

    /// Parse and resolve configuration text.
    ///
    /// Text with no document in it counts as no document at all.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::from_error(ValidationError::no_document_found());
        }

        let value: Value = match serde_yaml::from_str(text) {
            Ok(value) => value,
            Err(e) => return Self::from_error(ValidationError::bad_parse(e)),
        };

        // Comment-only and bare `---` documents parse to null.
        if value.is_null() {
            return Self::from_error(ValidationError::no_document_found());
        }
        Self::from_document(RawDocument::from_value(value))
    }

    /// Validate a parsed document and normalize it into canonical rules.
    ///
    /// Transformation only runs when validation reports nothing.
    pub fn from_document(doc: RawDocument) -> Self {
        let errors = validator::validate(&doc);
        if !errors.is_empty() {
            return Self::from_errors(errors);
        }

        let version = SchemaVersion::detect(&doc);
        debug!(?version, "schema version detected");

        let root = doc.into_root().unwrap_or(Value::Null);
        let normalized = match version {
            SchemaVersion::Legacy => legacy::transform(root).map(|t| (t.rules, t.warnings)),
            SchemaVersion::Canonical => canonical::extract(root).map(|rules| (rules, Vec::new())),
        };

        let (rules, mut warnings) = match normalized {
            Ok(normalized) => normalized,
            Err(e) => {
                return Self::from_error(ValidationError::schema_mismatch(format!(
                    "{:?} schema: {}",
                    version, e
                )));
            }
        };

        warnings.extend(lint(&rules));
        Self {
            errors: ValidationErrors::new(),
            warnings,
            settings: Some(Settings { version, rules }),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// `None` whenever errors are present.
    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// The canonical rules, or none when the configuration has errors.
    pub fn rules(&self) -> &[CanonicalRule] {
        self.settings
            .as_ref()
            .map(|s| s.rules.as_slice())
            .unwrap_or(&[])
    }

    pub fn into_settings(self) -> Option<Settings> {
        self.settings
    }
}
