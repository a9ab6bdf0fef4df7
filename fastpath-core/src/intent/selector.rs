//! Best-match selection
//!
//! Selection runs in two phases:
//! 1. Filter: keep candidates whose fast-intent config is present, enabled,
//!    and whose match expression evaluates true.
//! 2. Rank: pick the strongest survivor using [`RANKING`], compared key by
//!    key until one differs:
//!    - priority, higher first
//!    - `updatedAt`, later first (skipped unless both sides have one)
//!    - id, lexicographically smaller first
//!
//! Survivors equal on every key keep their input order, so the first one
//! encountered wins. This also covers duplicate ids.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::FastPathConfig;
use crate::experience::Experience;

use super::context::MatchContext;
use super::evaluator::ExpressionEvaluator;
use super::expression::MatchExpression;
use super::matcher::ConditionMatcher;
use super::registry::MatcherRegistry;

/// Sort direction of a ranking key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One step of the ranking chain
#[derive(Clone, Copy)]
pub struct RankKey {
    pub name: &'static str,
    /// Ascending comparison; `None` skips this key for the pair
    pub compare: fn(&Experience, &Experience) -> Option<Ordering>,
    pub direction: Direction,
}

impl RankKey {
    fn apply(&self, a: &Experience, b: &Experience) -> Ordering {
        match ((self.compare)(a, b), self.direction) {
            (None, _) => Ordering::Equal,
            (Some(ord), Direction::Ascending) => ord,
            (Some(ord), Direction::Descending) => ord.reverse(),
        }
    }
}

/// Ranking chain, strongest key first
pub const RANKING: [RankKey; 3] = [
    RankKey {
        name: "priority",
        compare: |a, b| Some(a.priority().cmp(&b.priority())),
        direction: Direction::Descending,
    },
    RankKey {
        name: "updated_at",
        compare: |a, b| match (a.updated_at, b.updated_at) {
            (Some(ta), Some(tb)) => Some(ta.cmp(&tb)),
            _ => None,
        },
        direction: Direction::Descending,
    },
    RankKey {
        name: "id",
        compare: |a, b| Some(a.id.cmp(&b.id)),
        direction: Direction::Ascending,
    },
];

/// Compare two candidates; `Less` means `a` ranks ahead of `b`
pub fn compare_rank(a: &Experience, b: &Experience) -> Ordering {
    RANKING
        .iter()
        .map(|key| key.apply(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Picks the experience that should preempt normal generation
#[derive(Debug, Clone)]
pub struct FastIntentSelector {
    evaluator: ExpressionEvaluator,
    enabled: bool,
}

impl Default for FastIntentSelector {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FastIntentSelector {
    /// Selector over the built-ins plus `custom` matchers
    pub fn new(custom: Vec<Arc<dyn ConditionMatcher>>) -> Self {
        Self::with_config(custom, &FastPathConfig::default())
    }

    /// Selector built from a config
    pub fn with_config(custom: Vec<Arc<dyn ConditionMatcher>>, config: &FastPathConfig) -> Self {
        let registry = MatcherRegistry::with_config(custom, config);
        Self {
            evaluator: ExpressionEvaluator::new(Arc::new(registry)),
            enabled: config.enabled,
        }
    }

    /// Selector sharing an existing registry
    pub fn from_registry(registry: Arc<MatcherRegistry>) -> Self {
        Self {
            evaluator: ExpressionEvaluator::new(registry),
            enabled: true,
        }
    }

    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Evaluate an optional expression; `None` never matches
    pub fn matches(&self, expr: Option<&MatchExpression>, context: &MatchContext) -> bool {
        self.evaluator.matches(expr, context)
    }

    /// Enabled candidates whose expression matches, in input order
    pub fn matching<'a, I>(&self, candidates: I, context: &MatchContext) -> Vec<&'a Experience>
    where
        I: IntoIterator<Item = &'a Experience>,
    {
        if !self.enabled {
            return Vec::new();
        }

        candidates
            .into_iter()
            .filter(|exp| {
                let Some(config) = exp.fast_intent_config.as_ref().filter(|c| c.enabled) else {
                    debug!(id = %exp.id, "skipping experience without enabled fast-intent config");
                    return false;
                };
                self.evaluator.matches(config.match_expr.as_ref(), context)
            })
            .collect()
    }

    /// The single best match, if any candidate matches
    pub fn select_best_match<'a, I>(&self, candidates: I, context: &MatchContext) -> Option<&'a Experience>
    where
        I: IntoIterator<Item = &'a Experience>,
    {
        if !self.enabled {
            debug!("fast-intent selection disabled by configuration");
            return None;
        }

        let best = self
            .matching(candidates, context)
            .into_iter()
            .reduce(|best, candidate| match compare_rank(candidate, best) {
                Ordering::Less => candidate,
                _ => best,
            })?;

        info!(
            id = %best.id,
            kind = %best.kind,
            title = %best.title,
            "found matched fast-intent experience"
        );
        Some(best)
    }
}
