//! Configuration for the FastPath engine

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FastPathError, Result};

/// Engine configuration
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastPathConfig {
    /// Global switch; when false the selector never returns a match
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Compiled program size limit (bytes) for `message_regex` patterns
    #[serde(default = "default_regex_size_limit")]
    pub regex_size_limit: usize,
}

fn default_true() -> bool { true }
fn default_regex_size_limit() -> usize { 1 << 20 }

impl Default for FastPathConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            regex_size_limit: default_regex_size_limit(),
        }
    }
}

impl FastPathConfig {
    /// Parse and validate a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FastPathConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Disable the engine
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the regex size limit
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.regex_size_limit == 0 {
            return Err(FastPathError::InvalidConfig {
                reason: "regexSizeLimit must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = FastPathConfig::from_json_str("{}").unwrap();
        assert_eq!(config, FastPathConfig::default());
        assert!(config.enabled);
        assert_eq!(config.regex_size_limit, 1 << 20);
    }

    #[test]
    fn test_partial_override() {
        let config = FastPathConfig::from_json_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.regex_size_limit, 1 << 20);
    }

    #[test]
    fn test_zero_size_limit_rejected() {
        let err = FastPathConfig::from_json_str(r#"{"regexSizeLimit": 0}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_malformed_json() {
        let err = FastPathConfig::from_json_str("{ enabled: ").unwrap_err();
        assert_eq!(err.error_code(), "JSON_ERROR");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"regexSizeLimit": 4096}}"#).unwrap();

        let config = FastPathConfig::from_file(file.path()).unwrap();
        assert_eq!(config.regex_size_limit, 4096);
        assert!(config.enabled);
    }

    #[test]
    fn test_missing_file() {
        let err = FastPathConfig::from_file("/nonexistent/fastpath.json").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }
}
