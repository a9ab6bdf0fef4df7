//! Condition matchers
//!
//! A [`ConditionMatcher`] evaluates one atomic [`Condition`] against a
//! [`MatchContext`]. Seven matchers ship built in:
//!
//! | type | fields | true when |
//! |---|---|---|
//! | `message_prefix` | `value`, `trim`, `ignoreCase` | input starts with `value` |
//! | `message_regex` | `pattern` | `pattern` is found somewhere in the input |
//! | `metadata_exists` | `key` | metadata has `key` |
//! | `metadata_equals` | `key`, `value` | metadata at `key` renders as `value` |
//! | `metadata_in` | `key`, `values` | metadata at `key` renders as one of `values` |
//! | `state_equals` | `key`, `value` | state at `key` renders as `value` |
//! | `tool_arg_equals` | `key`, `value` | tool argument `key` renders as `value` |
//!
//! Blank required fields make a condition false. Matchers report evaluation
//! failures as `Err`; the registry turns those into `false`.

use std::sync::Arc;

use regex::RegexBuilder;
use serde_json::Value;

use crate::config::FastPathConfig;
use crate::error::{FastPathError, Result};

use super::context::{has_text, stringify, MatchContext};
use super::expression::Condition;

pub const MESSAGE_PREFIX: &str = "message_prefix";
pub const MESSAGE_REGEX: &str = "message_regex";
pub const METADATA_EXISTS: &str = "metadata_exists";
pub const METADATA_EQUALS: &str = "metadata_equals";
pub const METADATA_IN: &str = "metadata_in";
pub const STATE_EQUALS: &str = "state_equals";
pub const TOOL_ARG_EQUALS: &str = "tool_arg_equals";

/// Evaluates atomic conditions of one type
pub trait ConditionMatcher: Send + Sync {
    /// Type name this matcher handles, e.g. `message_prefix`
    fn condition_type(&self) -> &str;

    /// Evaluate `condition` against `context`
    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool>;
}

/// All built-in matchers, configured from `config`
pub fn builtin_matchers(config: &FastPathConfig) -> Vec<Arc<dyn ConditionMatcher>> {
    let mut matchers: Vec<Arc<dyn ConditionMatcher>> = Vec::with_capacity(7);
    matchers.push(Arc::new(MessagePrefixMatcher));
    matchers.push(Arc::new(MessageRegexMatcher::new(config.regex_size_limit)));
    matchers.push(Arc::new(MetadataExistsMatcher));
    matchers.push(Arc::new(MetadataEqualsMatcher));
    matchers.push(Arc::new(MetadataInMatcher));
    matchers.push(Arc::new(StateEqualsMatcher));
    matchers.push(Arc::new(ToolArgEqualsMatcher));
    matchers
}

/// True if `found` is present and renders exactly as a non-blank `expected`
fn renders_as(found: Option<&Value>, expected: Option<&str>) -> bool {
    let Some(expected) = expected.filter(|e| has_text(Some(*e))) else {
        return false;
    };
    found.and_then(stringify).is_some_and(|s| s == expected)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePrefixMatcher;

impl ConditionMatcher for MessagePrefixMatcher {
    fn condition_type(&self) -> &str {
        MESSAGE_PREFIX
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let (Some(input), Some(prefix)) = (context.input(), condition.value.as_deref()) else {
            return Ok(false);
        };
        if !has_text(Some(input)) || !has_text(Some(prefix)) {
            return Ok(false);
        }

        let subject = if condition.is_trim() { input.trim() } else { input };
        if condition.is_ignore_case() {
            return Ok(subject.to_lowercase().starts_with(&prefix.to_lowercase()));
        }
        Ok(subject.starts_with(prefix))
    }
}

/// Substring search over the input text
///
/// Patterns use `regex` syntax with Unicode enabled, so `\d`, `\w` and `\s`
/// match non-ASCII digits, letters and spaces. `(?-u:\d)` restricts a class
/// to ASCII. The pattern is compiled on every evaluation.
#[derive(Debug, Clone, Copy)]
pub struct MessageRegexMatcher {
    size_limit: usize,
}

impl MessageRegexMatcher {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }
}

impl Default for MessageRegexMatcher {
    fn default() -> Self {
        Self::new(FastPathConfig::default().regex_size_limit)
    }
}

impl ConditionMatcher for MessageRegexMatcher {
    fn condition_type(&self) -> &str {
        MESSAGE_REGEX
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let (Some(input), Some(pattern)) = (context.input(), condition.pattern.as_deref()) else {
            return Ok(false);
        };
        if !has_text(Some(input)) || !has_text(Some(pattern)) {
            return Ok(false);
        }

        let regex = RegexBuilder::new(pattern)
            .size_limit(self.size_limit)
            .build()
            .map_err(|e| FastPathError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(regex.is_match(input))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExistsMatcher;

impl ConditionMatcher for MetadataExistsMatcher {
    fn condition_type(&self) -> &str {
        METADATA_EXISTS
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        match condition.key.as_deref() {
            Some(key) if has_text(Some(key)) => Ok(context.metadata().contains_key(key)),
            _ => Ok(false),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataEqualsMatcher;

impl ConditionMatcher for MetadataEqualsMatcher {
    fn condition_type(&self) -> &str {
        METADATA_EQUALS
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let Some(key) = condition.key.as_deref().filter(|k| has_text(Some(*k))) else {
            return Ok(false);
        };
        Ok(renders_as(context.metadata_value(key), condition.value.as_deref()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataInMatcher;

impl ConditionMatcher for MetadataInMatcher {
    fn condition_type(&self) -> &str {
        METADATA_IN
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let Some(key) = condition.key.as_deref().filter(|k| has_text(Some(*k))) else {
            return Ok(false);
        };
        if condition.values.is_empty() {
            return Ok(false);
        }
        Ok(context
            .metadata_value(key)
            .and_then(stringify)
            .is_some_and(|s| condition.values.contains(&s)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StateEqualsMatcher;

impl ConditionMatcher for StateEqualsMatcher {
    fn condition_type(&self) -> &str {
        STATE_EQUALS
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let Some(key) = condition.key.as_deref().filter(|k| has_text(Some(*k))) else {
            return Ok(false);
        };
        let found = context.state_value(key);
        Ok(renders_as(found.as_ref(), condition.value.as_deref()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToolArgEqualsMatcher;

impl ConditionMatcher for ToolArgEqualsMatcher {
    fn condition_type(&self) -> &str {
        TOOL_ARG_EQUALS
    }

    fn matches(&self, condition: &Condition, context: &MatchContext) -> Result<bool> {
        let Some(key) = condition.key.as_deref().filter(|k| has_text(Some(*k))) else {
            return Ok(false);
        };
        Ok(renders_as(context.tool_arg(key), condition.value.as_deref()))
    }
}
