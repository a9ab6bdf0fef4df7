//! # FastPath Core - intent shortcuts for conversational agents
//!
//! FastPath decides whether a pre-authored **experience** (a canned response
//! or tool-call plan) should preempt normal model generation for a turn.
//!
//! - **Match expressions**: boolean trees (`allOf` / `anyOf` / `not`) over
//!   atomic conditions
//! - **Matcher registry**: pluggable condition types, seven built in
//! - **Selector**: filters candidates and ranks survivors deterministically
//!
//! The selected experience is returned as-is; executing its artifact is the
//! host pipeline's job.
//!
//! ## Example
//!
//! ```rust
//! use fastpath_core::{ExperienceCatalog, FastIntentSelector, MatchContext};
//!
//! let mut catalog = ExperienceCatalog::new();
//! catalog.load_from_json(r#"[
//!     {
//!         "id": "order-status",
//!         "title": "Order status lookup",
//!         "type": "REACT",
//!         "fastIntentConfig": {
//!             "enabled": true,
//!             "priority": 10,
//!             "match": {"allOf": [
//!                 {"condition": {"type": "message_regex", "pattern": "order\\s*#?\\d+"}},
//!                 {"condition": {"type": "metadata_equals", "key": "lang", "value": "en"}}
//!             ]}
//!         }
//!     }
//! ]"#).unwrap();
//!
//! let selector = FastIntentSelector::default();
//! let context = MatchContext::new("where is order #42?")
//!     .with_metadata_entry("lang", "en");
//!
//! let best = selector.select_best_match(catalog.experiences(), &context);
//! assert_eq!(best.map(|e| e.id.as_str()), Some("order-status"));
//! ```

pub mod config;
pub mod error;
pub mod experience;
pub mod intent;

pub use config::FastPathConfig;
pub use error::{ErrorCategory, FastPathError, Result};
pub use experience::{
    Experience, ExperienceArtifact, ExperienceCatalog, ExperienceType, FastIntentConfig,
    FastIntentFallback, FastIntentMode, OnMatch,
};
pub use intent::{
    ChatMessage, Condition, ConditionMatcher, ExpressionEvaluator, FastIntentSelector,
    MatchContext, MatchExpression, MatcherRegistry, MessageRole, StateAccessor, StateFn,
};
