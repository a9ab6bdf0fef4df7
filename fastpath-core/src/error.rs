//! Error types for FastPath operations
//!
//! The matching path itself never surfaces errors to its caller: matcher
//! failures are reported as [`FastPathError`] values and absorbed at the
//! atomic-condition boundary by the registry. Loading paths (configuration,
//! experience catalogs) do return these errors.
//!
//! Each variant carries a stable error code (e.g. `INVALID_PATTERN`) usable
//! for log aggregation and client-side handling.
//!
//! # Example
//!
//! ```rust
//! use fastpath_core::error::{FastPathError, ErrorCategory};
//!
//! let err = FastPathError::DuplicateExperience { id: "exp-1".to_string() };
//! assert_eq!(err.error_code(), "DUPLICATE_EXPERIENCE");
//! assert_eq!(err.category(), ErrorCategory::Conflict);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for FastPath operations
pub type Result<T> = std::result::Result<T, FastPathError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A single predicate could not be evaluated
    Matching,
    /// Input validation failed
    Validation,
    /// Duplicate or conflicting definitions
    Conflict,
    /// I/O and serialization failures
    External,
}

/// Errors that can occur in FastPath operations
#[derive(Error, Debug)]
pub enum FastPathError {
    // ═══════════════════════════════════════════════════════════════════════
    // Matcher errors (isolated to one atomic condition)
    // ═══════════════════════════════════════════════════════════════════════

    /// Regex pattern failed to compile or exceeded the configured size limit
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A matcher could not evaluate its condition
    #[error("Matcher '{condition_type}' failed: {reason}")]
    MatcherFailed { condition_type: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Experience catalog errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Experience record is malformed or missing required fields
    #[error("Invalid experience: {reason}")]
    InvalidExperience { reason: String },

    /// Two experiences share the same identifier
    #[error("Duplicate experience id: '{id}'. Experience ids must be unique within a catalog.")]
    DuplicateExperience { id: String },

    /// Failed to load experiences from a file or directory
    #[error("Failed to load experiences from '{path}': {reason}")]
    ExperienceLoadError { path: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Configuration errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Configuration value is out of range or inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════════════════

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FastPathError {
    /// Shorthand for a matcher failure
    pub fn matcher_failed(condition_type: impl Into<String>, reason: impl Into<String>) -> Self {
        FastPathError::MatcherFailed {
            condition_type: condition_type.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error was raised while evaluating a condition
    pub fn is_matcher_failure(&self) -> bool {
        matches!(self.category(), ErrorCategory::Matching)
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            FastPathError::InvalidPattern { .. }
            | FastPathError::MatcherFailed { .. } => ErrorCategory::Matching,

            FastPathError::InvalidExperience { .. }
            | FastPathError::InvalidConfig { .. } => ErrorCategory::Validation,

            FastPathError::DuplicateExperience { .. } => ErrorCategory::Conflict,

            FastPathError::ExperienceLoadError { .. }
            | FastPathError::JsonError(_)
            | FastPathError::IoError(_) => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FastPathError::InvalidPattern { .. } => "INVALID_PATTERN",
            FastPathError::MatcherFailed { .. } => "MATCHER_FAILED",
            FastPathError::InvalidExperience { .. } => "INVALID_EXPERIENCE",
            FastPathError::DuplicateExperience { .. } => "DUPLICATE_EXPERIENCE",
            FastPathError::ExperienceLoadError { .. } => "EXPERIENCE_LOAD_ERROR",
            FastPathError::InvalidConfig { .. } => "INVALID_CONFIG",
            FastPathError::JsonError(_) => "JSON_ERROR",
            FastPathError::IoError(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            FastPathError::InvalidPattern {
                pattern: "(".to_string(),
                reason: "unclosed group".to_string()
            }
            .error_code(),
            "INVALID_PATTERN"
        );
        assert_eq!(
            FastPathError::matcher_failed("custom", "boom").error_code(),
            "MATCHER_FAILED"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            FastPathError::InvalidConfig {
                reason: "zero".to_string()
            }
            .category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            FastPathError::DuplicateExperience {
                id: "a".to_string()
            }
            .category(),
            ErrorCategory::Conflict
        );

        let io = FastPathError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::External);
        assert_eq!(io.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_matcher_failure_detection() {
        assert!(FastPathError::matcher_failed("x", "y").is_matcher_failure());
        assert!(!FastPathError::InvalidExperience {
            reason: "blank id".to_string()
        }
        .is_matcher_failure());
    }

    #[test]
    fn test_error_messages_are_helpful() {
        let err = FastPathError::DuplicateExperience {
            id: "greeting".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("greeting"));
        assert!(msg.contains("unique"));
    }
}
