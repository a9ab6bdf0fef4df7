//! Expression Evaluator
//!
//! Walks a [`MatchExpression`] tree and resolves atomic conditions through
//! the [`MatcherRegistry`]. Evaluation is total: it always returns a bool.
//!
//! - `Not`: negation of the child
//! - `AllOf`: every child true, stops at the first false
//! - `AnyOf`: some child true, stops at the first true
//! - `Condition`: registry lookup, failures count as false
//! - `Empty`, and `AllOf`/`AnyOf` with no children: false
//!
//! Trees are assumed acyclic and shallow; no depth limit is enforced.

use std::sync::Arc;

use super::context::MatchContext;
use super::expression::MatchExpression;
use super::registry::MatcherRegistry;

/// Evaluates match expressions against a context
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    registry: Arc<MatcherRegistry>,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(MatcherRegistry::new()))
    }
}

impl ExpressionEvaluator {
    pub fn new(registry: Arc<MatcherRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MatcherRegistry {
        &self.registry
    }

    /// Evaluate an optional expression; `None` never matches
    pub fn matches(&self, expr: Option<&MatchExpression>, context: &MatchContext) -> bool {
        expr.is_some_and(|e| self.evaluate(e, context))
    }

    /// Evaluate `expr` against `context`
    pub fn evaluate(&self, expr: &MatchExpression, context: &MatchContext) -> bool {
        match expr {
            MatchExpression::Not(child) => !self.evaluate(child, context),
            MatchExpression::AllOf(children) if !children.is_empty() => {
                children.iter().all(|child| self.evaluate(child, context))
            }
            MatchExpression::AnyOf(children) if !children.is_empty() => {
                children.iter().any(|child| self.evaluate(child, context))
            }
            MatchExpression::Condition(condition) => self.registry.evaluate(condition, context),
            MatchExpression::AllOf(_) | MatchExpression::AnyOf(_) | MatchExpression::Empty => false,
        }
    }
}
