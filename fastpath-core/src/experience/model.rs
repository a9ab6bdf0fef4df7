//! Experience types
//!
//! Experiences are authored elsewhere and read-only here. The matching core
//! only looks at the identifier, timestamp and [`FastIntentConfig`]; the
//! artifact is carried through untouched for the downstream executor.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::intent::MatchExpression;

/// Kind of experience, which decides how its artifact is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceType {
    /// Generated-code function, skips the code-generation model
    Code,
    /// Tool-call plan fed straight into tool execution
    React,
    #[default]
    Common,
}

impl std::fmt::Display for ExperienceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceType::Code => write!(f, "CODE"),
            ExperienceType::React => write!(f, "REACT"),
            ExperienceType::Common => write!(f, "COMMON"),
        }
    }
}

/// An authored canned response or tool plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    /// Unique identifier
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Experience kind
    #[serde(default, rename = "type")]
    pub kind: ExperienceType,

    /// Last modification time, used as a ranking tie-break
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Fast-intent configuration; experiences without one never match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_intent_config: Option<FastIntentConfig>,

    /// Executable artifact, opaque to the matching core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ExperienceArtifact>,
}

impl Experience {
    /// Create an experience with no fast-intent configuration
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: ExperienceType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            updated_at: None,
            fast_intent_config: None,
            artifact: None,
        }
    }

    /// Attach a fast-intent configuration
    pub fn with_fast_intent(mut self, config: FastIntentConfig) -> Self {
        self.fast_intent_config = Some(config);
        self
    }

    /// Set the update timestamp
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Attach an artifact
    pub fn with_artifact(mut self, artifact: ExperienceArtifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Priority from the fast-intent config, 0 when there is none
    pub fn priority(&self) -> i32 {
        self.fast_intent_config.as_ref().map_or(0, |c| c.priority)
    }

    /// True if a fast-intent config is present and enabled
    pub fn is_fast_intent_enabled(&self) -> bool {
        self.fast_intent_config.as_ref().is_some_and(|c| c.enabled)
    }
}

/// Per-experience fast-intent configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastIntentConfig {
    /// Disabled configs never match
    #[serde(default)]
    pub enabled: bool,

    /// Higher wins when several experiences match
    #[serde(default)]
    pub priority: i32,

    /// Match expression; absent means never match
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_expr: Option<MatchExpression>,

    /// Downstream behavior after a match
    #[serde(default)]
    pub on_match: OnMatch,
}

impl FastIntentConfig {
    /// Enabled config with the given expression and priority 0
    pub fn enabled(match_expr: MatchExpression) -> Self {
        Self {
            enabled: true,
            priority: 0,
            match_expr: Some(match_expr),
            on_match: OnMatch::default(),
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the on-match policy
    pub fn with_on_match(mut self, on_match: OnMatch) -> Self {
        self.on_match = on_match;
        self
    }
}

/// What the downstream executor does once an experience is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnMatch {
    #[serde(default)]
    pub mode: FastIntentMode,

    #[serde(default)]
    pub fallback: FastIntentFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FastIntentMode {
    /// Execute the artifact directly
    #[default]
    #[serde(rename = "FASTPATH")]
    FastPath,
    /// Execute the artifact, then fall back to reference-guided generation
    #[serde(rename = "FASTPATH_THEN_REFERENCE")]
    FastPathThenReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FastIntentFallback {
    /// On failure, use the experience only as a prompt reference
    #[default]
    #[serde(rename = "REFERENCE_ONLY")]
    ReferenceOnly,
    /// On failure, surface the error
    #[serde(rename = "FAIL_FAST")]
    FailFast,
}

/// Executable payload of an experience
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperienceArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeArtifact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react: Option<ReactArtifact>,
}

/// A registrable function (e.g. python) that replaces code generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    #[serde(default)]
    pub parameters: Vec<String>,

    /// Full function source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Assistant text plus a tool-call plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<ToolPlan>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPlan {
    #[serde(default)]
    pub tool_calls: Vec<ToolCallSpec>,
}

/// One planned tool invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallSpec {
    pub tool_name: String,

    #[serde(default)]
    pub arguments: HashMap<String, Value>,
}
