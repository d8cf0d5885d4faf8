//! Canonical rule representation.
//!
//! Every schema generation is normalized into a list of [`CanonicalRule`]s.
//! Rule entries are `do`-tagged variants; parameters a variant does not model
//! are kept in its `extra` map so a rule list survives a round trip unchanged.

use super::field::Field;
use super::tagged::{self, Tagged};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Unknown fields preserved for forward compatibility.
pub type Extra = BTreeMap<String, Value>;

/// One rule: a trigger, its conditions, and the actions for each outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalRule {
    /// Comma-separated glob patterns over event names.
    pub when: String,

    #[serde(default)]
    pub validate: Vec<Validator>,

    /// Run when all validations succeed.
    #[serde(default)]
    pub pass: Vec<Action>,

    /// Run when a validation fails.
    #[serde(default)]
    pub fail: Vec<Action>,

    /// Run when evaluation itself errors.
    #[serde(default)]
    pub error: Vec<Action>,

    #[serde(flatten)]
    pub extra: Extra,

    /// Compiled `when`, built on the first match.
    #[serde(skip)]
    matcher: OnceLock<TriggerMatcher>,
}

impl PartialEq for CanonicalRule {
    fn eq(&self, other: &Self) -> bool {
        self.when == other.when
            && self.validate == other.validate
            && self.pass == other.pass
            && self.fail == other.fail
            && self.error == other.error
            && self.extra == other.extra
    }
}

impl CanonicalRule {
    pub fn new(when: impl Into<String>) -> Self {
        Self {
            when: when.into(),
            validate: Vec::new(),
            pass: Vec::new(),
            fail: Vec::new(),
            error: Vec::new(),
            extra: Extra::new(),
            matcher: OnceLock::new(),
        }
    }

    /// Individual trigger patterns of `when`, trimmed, blanks dropped.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        split_triggers(&self.when)
    }

    /// Whether a concrete event name (`issues.opened`) fires this rule.
    ///
    /// A pattern that is not a valid glob only matches itself literally.
    pub fn matches(&self, event: &str) -> bool {
        let cached = self
            .matcher
            .get_or_init(|| TriggerMatcher::build(&self.when));

        // `when` is public; a rule edited after its first match recompiles.
        if cached.source == self.when {
            cached.is_match(event)
        } else {
            TriggerMatcher::build(&self.when).is_match(event)
        }
    }
}

fn split_triggers(when: &str) -> impl Iterator<Item = &str> {
    when.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Compiled trigger patterns of one `when`.
#[derive(Debug, Clone)]
struct TriggerMatcher {
    source: String,
    globs: GlobSet,
    /// Patterns that are not valid globs, matched verbatim.
    literals: Vec<String>,
}

impl TriggerMatcher {
    fn build(when: &str) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut literals = Vec::new();
        for trigger in split_triggers(when) {
            match Glob::new(trigger) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(_) => literals.push(trigger.to_string()),
            }
        }

        Self {
            source: when.to_string(),
            globs: builder.build().unwrap_or_else(|_| GlobSet::empty()),
            literals,
        }
    }

    fn is_match(&self, event: &str) -> bool {
        self.literals.iter().any(|l| l == event) || self.globs.is_match(event)
    }
}

// ============================================================================
// Validators
// ============================================================================

/// A condition evaluated by a rule, discriminated by `do`.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Approvals(ApprovalsCheck),
    Title(PatternCheck),
    Label(PatternCheck),
    Description(PatternCheck),
    Milestone(PatternCheck),
    Stale(StaleCheck),
    /// A kind this crate does not model.
    Other { kind: String, params: Mapping },
}

impl Validator {
    /// `{do: approvals, min: {count}}`.
    pub fn min_approvals(count: u32) -> Self {
        Validator::Approvals(ApprovalsCheck {
            min: Field::Set(Count::new(count)),
            ..ApprovalsCheck::default()
        })
    }

    /// `{do: stale, days}`.
    pub fn stale(days: u32) -> Self {
        Validator::Stale(StaleCheck {
            days,
            extra: Extra::new(),
        })
    }

    /// Pattern checks that carry regexes (`title`, `label`, `description`,
    /// `milestone`).
    pub fn pattern_check(&self) -> Option<&PatternCheck> {
        match self {
            Validator::Title(check)
            | Validator::Label(check)
            | Validator::Description(check)
            | Validator::Milestone(check) => Some(check),
            _ => None,
        }
    }
}

impl Tagged for Validator {
    fn kind(&self) -> &str {
        match self {
            Validator::Approvals(_) => "approvals",
            Validator::Title(_) => "title",
            Validator::Label(_) => "label",
            Validator::Description(_) => "description",
            Validator::Milestone(_) => "milestone",
            Validator::Stale(_) => "stale",
            Validator::Other { kind, .. } => kind,
        }
    }

    fn params(&self) -> Result<Value, serde_yaml::Error> {
        match self {
            Validator::Approvals(check) => serde_yaml::to_value(check),
            Validator::Title(check)
            | Validator::Label(check)
            | Validator::Description(check)
            | Validator::Milestone(check) => serde_yaml::to_value(check),
            Validator::Stale(check) => serde_yaml::to_value(check),
            Validator::Other { params, .. } => Ok(Value::Mapping(params.clone())),
        }
    }

    fn from_parts(kind: String, params: Mapping) -> Result<Self, serde_yaml::Error> {
        Ok(match kind.as_str() {
            "approvals" => Validator::Approvals(tagged::payload(params)?),
            "title" => Validator::Title(tagged::payload(params)?),
            "label" => Validator::Label(tagged::payload(params)?),
            "description" => Validator::Description(tagged::payload(params)?),
            "milestone" => Validator::Milestone(tagged::payload(params)?),
            "stale" => Validator::Stale(tagged::payload(params)?),
            _ => Validator::Other { kind, params },
        })
    }
}

impl Serialize for Validator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        tagged::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Validator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        tagged::deserialize(deserializer)
    }
}

/// A numeric threshold with an optional failure message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Count {
    pub count: u32,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub message: Field<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Count {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            message: Field::Absent,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalsCheck {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub min: Field<Count>,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub max: Field<Count>,

    /// Required reviewers; shape is left to the evaluator.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub required: Field<Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// A case-insensitive regular expression with an optional failure message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegexSpec {
    pub regex: String,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub message: Field<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl RegexSpec {
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            message: Field::Absent,
            extra: Extra::new(),
        }
    }

    /// Compile the pattern the way evaluators apply it (case-insensitive).
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        RegexBuilder::new(&self.regex).case_insensitive(true).build()
    }
}

/// A literal prefix/suffix check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    #[serde(rename = "match")]
    pub text: String,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub message: Field<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

/// Checks over a text attribute (title, labels, description, milestone).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternCheck {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub must_include: Field<RegexSpec>,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub must_exclude: Field<RegexSpec>,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub begins_with: Field<MatchSpec>,

    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub ends_with: Field<MatchSpec>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl PatternCheck {
    /// Only `must_exclude.regex` set.
    pub fn excluding(regex: impl Into<String>) -> Self {
        Self {
            must_exclude: Field::Set(RegexSpec::new(regex)),
            ..Self::default()
        }
    }

    pub fn regexes(&self) -> impl Iterator<Item = &RegexSpec> {
        self.must_include.get().into_iter().chain(self.must_exclude.get())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaleCheck {
    /// Days without activity before an item is stale.
    pub days: u32,

    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Actions
// ============================================================================

/// An action run for a rule outcome, discriminated by `do`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Comment(CommentAction),
    Labels(LabelsAction),
    Assign(AssignAction),
    Close(CloseAction),
    /// A kind this crate does not model.
    Other { kind: String, params: Mapping },
}

impl Action {
    /// `{do: comment, payload: {body}}`.
    pub fn comment(body: impl Into<String>) -> Self {
        Action::Comment(CommentAction {
            payload: CommentPayload {
                body: body.into(),
                extra: Extra::new(),
            },
            extra: Extra::new(),
        })
    }
}

impl Tagged for Action {
    fn kind(&self) -> &str {
        match self {
            Action::Comment(_) => "comment",
            Action::Labels(_) => "labels",
            Action::Assign(_) => "assign",
            Action::Close(_) => "close",
            Action::Other { kind, .. } => kind,
        }
    }

    fn params(&self) -> Result<Value, serde_yaml::Error> {
        match self {
            Action::Comment(action) => serde_yaml::to_value(action),
            Action::Labels(action) => serde_yaml::to_value(action),
            Action::Assign(action) => serde_yaml::to_value(action),
            Action::Close(action) => serde_yaml::to_value(action),
            Action::Other { params, .. } => Ok(Value::Mapping(params.clone())),
        }
    }

    fn from_parts(kind: String, params: Mapping) -> Result<Self, serde_yaml::Error> {
        Ok(match kind.as_str() {
            "comment" => Action::Comment(tagged::payload(params)?),
            "labels" => Action::Labels(tagged::payload(params)?),
            "assign" => Action::Assign(tagged::payload(params)?),
            "close" => Action::Close(tagged::payload(params)?),
            _ => Action::Other { kind, params },
        })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        tagged::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        tagged::deserialize(deserializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub body: String,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentAction {
    pub payload: CommentPayload,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelsAction {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub labels: Field<Vec<String>>,

    /// `add`, `replace`, or `delete`; evaluator decides the default.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub mode: Field<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignAction {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub assignees: Field<Vec<String>>,

    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloseAction {
    #[serde(flatten)]
    pub extra: Extra,
}
