//! Fast Intent - condition matching and best-match selection
//!
//! ## Architecture
//!
//! ```text
//!   Experiences (candidates)        MatchContext (per turn)
//!            │                              │
//!            ▼                              ▼
//!    ┌────────────────────────────────────────────┐
//!    │            FastIntentSelector              │
//!    │                                            │
//!    │  1. Skip disabled / unconfigured           │
//!    │  2. ExpressionEvaluator: AND / OR / NOT    │
//!    │  3. MatcherRegistry: atomic conditions     │
//!    │  4. Rank by priority, updatedAt, id        │
//!    └────────────────────────────────────────────┘
//!                         │
//!                         ▼
//!              Option<&Experience> (winner)
//! ```

mod context;
mod evaluator;
mod expression;
pub mod matcher;
mod registry;
mod selector;

pub use context::{
    has_text, stringify, ChatMessage, MatchContext, MessageRole, StateAccessor, StateFn,
    STATE_INPUT_KEY, STATE_MESSAGES_KEY,
};
pub use evaluator::ExpressionEvaluator;
pub use expression::{Condition, MatchExpression};
pub use matcher::{builtin_matchers, ConditionMatcher};
pub use registry::MatcherRegistry;
pub use selector::{compare_rank, Direction, FastIntentSelector, RankKey, RANKING};
