//! Error and warning taxonomy for configuration resolution.
//!
//! Errors form a closed set keyed by [`ErrorCode`]. A result holds at most one
//! error per code; the first detail recorded for a code is kept.

use super::defaults::{FILE_NAME, ROOT_KEY, VERSION_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of resolution error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration text failed to parse as structured data.
    BadParse,
    /// No configuration document exists on any applicable branch.
    NoDocumentFound,
    /// Parsed document lacks the required top-level key.
    MissingRootNode,
    /// A `version` field is present but not numeric.
    UnknownVersion,
    /// A remote read failed.
    RemoteAccessError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadParse => "BAD_PARSE",
            ErrorCode::NoDocumentFound => "NO_DOCUMENT_FOUND",
            ErrorCode::MissingRootNode => "MISSING_ROOT_NODE",
            ErrorCode::UnknownVersion => "UNKNOWN_VERSION",
            ErrorCode::RemoteAccessError => "REMOTE_ACCESS_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (code, message) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_parse(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::BadParse,
            format!("invalid YAML format > {}", detail),
        )
    }

    /// Well-formed YAML whose `hydrabot` tree does not fit the schema its
    /// version selects.
    pub fn schema_mismatch(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::BadParse,
            format!("`{}` does not match the expected schema > {}", ROOT_KEY, detail),
        )
    }

    pub fn no_document_found() -> Self {
        Self::new(
            ErrorCode::NoDocumentFound,
            format!("no config file found (expected {})", FILE_NAME),
        )
    }

    pub fn missing_root_node() -> Self {
        Self::new(
            ErrorCode::MissingRootNode,
            format!("the `{}` node is missing", ROOT_KEY),
        )
    }

    pub fn unknown_version() -> Self {
        Self::new(
            ErrorCode::UnknownVersion,
            format!("invalid `{}` found, expected a number", VERSION_KEY),
        )
    }

    /// Remote read failure; `detail` is the upstream error text.
    pub fn remote_access(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::RemoteAccessError,
            format!(
                "remote error while fetching the config file at {}: {}",
                FILE_NAME, detail
            ),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Ordered set of errors with at most one entry per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. A code that is already present keeps its first
    /// message; returns `false` in that case.
    pub fn insert(&mut self, error: ValidationError) -> bool {
        if self.has(error.code) {
            return false;
        }
        self.0.push(error);
        true
    }

    pub fn has(&self, code: ErrorCode) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    pub fn get(&self, code: ErrorCode) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.code == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn codes(&self) -> Vec<ErrorCode> {
        self.0.iter().map(|e| e.code).collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Non-fatal findings reported next to successfully resolved settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// A `must_include`/`must_exclude` pattern does not compile.
    InvalidRegex,
    /// A rule has a blank `when`.
    EmptyTrigger,
    /// A validate entry uses a `do` kind outside the known set.
    UnknownValidator,
    /// A pass/fail/error entry uses a `do` kind outside the known set.
    UnknownAction,
    /// Legacy top-level shorthand was ignored because area sections exist.
    IgnoredShorthand,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::InvalidRegex => "INVALID_REGEX",
            WarningCode::EmptyTrigger => "EMPTY_TRIGGER",
            WarningCode::UnknownValidator => "UNKNOWN_VALIDATOR",
            WarningCode::UnknownAction => "UNKNOWN_ACTION",
            WarningCode::IgnoredShorthand => "IGNORED_SHORTHAND",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}
