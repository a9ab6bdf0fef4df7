//! Experiences - authored shortcuts that can preempt normal generation
//!
//! An [`Experience`] carries an optional [`FastIntentConfig`] describing when
//! it should fire, and an [`ExperienceArtifact`] the downstream executor runs
//! once it is selected. The [`ExperienceCatalog`] loads them from JSON.

mod catalog;
mod model;

pub use catalog::ExperienceCatalog;
pub use model::{
    CodeArtifact, Experience, ExperienceArtifact, ExperienceType, FastIntentConfig,
    FastIntentFallback, FastIntentMode, OnMatch, ReactArtifact, ToolCallSpec, ToolPlan,
};
