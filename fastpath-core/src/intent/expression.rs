//! Match expressions and atomic conditions
//!
//! On the wire an expression is a JSON object with up to four fields:
//!
//! ```json
//! { "allOf": [...], "anyOf": [...], "not": {...}, "condition": {...} }
//! ```
//!
//! In memory it is a tagged [`MatchExpression`]. When an authored object
//! populates more than one field, the variant is chosen in this order:
//! `not`, then a non-empty `allOf`, then a non-empty `anyOf`, then
//! `condition`. An object with nothing populated (or `null`) becomes
//! [`MatchExpression::Empty`], which never matches.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::context::stringify;

/// Boolean expression over atomic conditions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<RawMatchExpression>", into = "RawMatchExpression")]
pub enum MatchExpression {
    /// Negation of a single child
    Not(Box<MatchExpression>),
    /// Conjunction; only non-empty lists take part in evaluation
    AllOf(Vec<MatchExpression>),
    /// Disjunction; only non-empty lists take part in evaluation
    AnyOf(Vec<MatchExpression>),
    /// Atomic predicate, resolved through the matcher registry
    Condition(Condition),
    /// Nothing populated
    #[default]
    Empty,
}

impl MatchExpression {
    pub fn all_of(children: Vec<MatchExpression>) -> Self {
        MatchExpression::AllOf(children)
    }

    pub fn any_of(children: Vec<MatchExpression>) -> Self {
        MatchExpression::AnyOf(children)
    }

    pub fn negate(child: MatchExpression) -> Self {
        MatchExpression::Not(Box::new(child))
    }

    pub fn condition(condition: Condition) -> Self {
        MatchExpression::Condition(condition)
    }

    /// True for [`MatchExpression::Empty`]
    pub fn is_empty(&self) -> bool {
        matches!(self, MatchExpression::Empty)
    }
}

impl std::ops::Not for MatchExpression {
    type Output = MatchExpression;

    fn not(self) -> Self::Output {
        MatchExpression::negate(self)
    }
}

impl From<Condition> for MatchExpression {
    fn from(condition: Condition) -> Self {
        MatchExpression::Condition(condition)
    }
}

/// Untagged authoring shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatchExpression {
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    any_of: Vec<MatchExpression>,

    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    all_of: Vec<MatchExpression>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    not: Option<Box<MatchExpression>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

impl From<Option<RawMatchExpression>> for MatchExpression {
    fn from(raw: Option<RawMatchExpression>) -> Self {
        let Some(raw) = raw else {
            return MatchExpression::Empty;
        };

        if let Some(child) = raw.not {
            return MatchExpression::Not(child);
        }
        if !raw.all_of.is_empty() {
            return MatchExpression::AllOf(raw.all_of);
        }
        if !raw.any_of.is_empty() {
            return MatchExpression::AnyOf(raw.any_of);
        }
        match raw.condition {
            Some(condition) => MatchExpression::Condition(condition),
            None => MatchExpression::Empty,
        }
    }
}

impl From<MatchExpression> for RawMatchExpression {
    fn from(expr: MatchExpression) -> Self {
        let mut raw = RawMatchExpression::default();
        match expr {
            MatchExpression::Not(child) => raw.not = Some(child),
            MatchExpression::AllOf(children) => raw.all_of = children,
            MatchExpression::AnyOf(children) => raw.any_of = children,
            MatchExpression::Condition(condition) => raw.condition = Some(condition),
            MatchExpression::Empty => {}
        }
        raw
    }
}

/// Atomic predicate
///
/// `kind` selects the matcher; the remaining fields are interpreted by that
/// matcher and ignored by the others.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Matcher type name, e.g. `message_prefix`
    #[serde(default, rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, deserialize_with = "scalar_as_string", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, deserialize_with = "scalars_as_strings", skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,

    /// Regular expression for `message_regex`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<bool>,
}

impl Condition {
    /// Create a condition of the given matcher type
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = Some(ignore_case);
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// `ignoreCase`, absent treated as false
    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case.unwrap_or(false)
    }

    /// `trim`, absent treated as false
    pub fn is_trim(&self) -> bool {
        self.trim.unwrap_or(false)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| stringify(&v)))
}

fn scalars_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.iter().filter_map(stringify).collect())
}
