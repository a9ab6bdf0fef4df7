//! Matcher Registry
//!
//! Maps condition type names to [`ConditionMatcher`] implementations.
//! Custom matchers supplied at construction are registered first; each
//! built-in is then added only if its type name is still free. A custom
//! matcher can therefore replace a built-in, but no built-in ever replaces
//! another matcher.
//!
//! The registry is immutable after construction and can be shared across
//! threads behind an `Arc`.

use std::any::Any;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::FastPathConfig;

use super::context::{has_text, MatchContext};
use super::expression::Condition;
use super::matcher::{builtin_matchers, ConditionMatcher};

/// Type name to matcher lookup
pub struct MatcherRegistry {
    matchers: HashMap<String, Arc<dyn ConditionMatcher>>,
}

impl std::fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("types", &self.types())
            .finish()
    }
}

impl Default for MatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherRegistry {
    /// Registry with only the built-in matchers
    pub fn new() -> Self {
        Self::with_config(Vec::new(), &FastPathConfig::default())
    }

    /// Registry with custom matchers plus any built-ins they don't replace
    pub fn with_matchers(custom: Vec<Arc<dyn ConditionMatcher>>) -> Self {
        Self::with_config(custom, &FastPathConfig::default())
    }

    /// Registry with custom matchers and configured built-ins
    ///
    /// Custom matchers with a blank type name are ignored. When two custom
    /// matchers share a type name the later one wins.
    pub fn with_config(custom: Vec<Arc<dyn ConditionMatcher>>, config: &FastPathConfig) -> Self {
        let mut matchers: HashMap<String, Arc<dyn ConditionMatcher>> = HashMap::new();

        for matcher in custom {
            let condition_type = matcher.condition_type().to_string();
            if !has_text(Some(&condition_type)) {
                warn!("ignoring custom matcher with blank condition type");
                continue;
            }
            if matchers.insert(condition_type.clone(), matcher).is_some() {
                debug!(condition_type = %condition_type, "custom matcher replaced an earlier registration");
            }
        }

        for builtin in builtin_matchers(config) {
            match matchers.entry(builtin.condition_type().to_string()) {
                Entry::Occupied(entry) => {
                    debug!(condition_type = %entry.key(), "built-in matcher overridden by custom matcher");
                }
                Entry::Vacant(entry) => {
                    entry.insert(builtin);
                }
            }
        }

        Self { matchers }
    }

    /// Matcher registered for `condition_type`
    pub fn get(&self, condition_type: &str) -> Option<&Arc<dyn ConditionMatcher>> {
        self.matchers.get(condition_type)
    }

    pub fn contains(&self, condition_type: &str) -> bool {
        self.matchers.contains_key(condition_type)
    }

    /// Registered type names, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Evaluate one atomic condition
    ///
    /// Never fails: a blank or unknown type, a matcher error and a matcher
    /// panic all evaluate to `false`. The last three are logged as warnings.
    pub fn evaluate(&self, condition: &Condition, context: &MatchContext) -> bool {
        if !has_text(Some(&condition.kind)) {
            return false;
        }

        let Some(matcher) = self.matchers.get(&condition.kind) else {
            warn!(condition_type = %condition.kind, "unknown condition type");
            return false;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| matcher.matches(condition, context)));
        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                warn!(
                    condition_type = %condition.kind,
                    code = e.error_code(),
                    error = %e,
                    "condition matcher failed"
                );
                false
            }
            Err(payload) => {
                warn!(
                    condition_type = %condition.kind,
                    error = %panic_message(payload.as_ref()),
                    "condition matcher panicked"
                );
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
