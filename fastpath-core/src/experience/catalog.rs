//! Experience Catalog
//!
//! Loads candidate experiences from:
//! - JSON strings (a single experience object or an array of them)
//! - JSON files
//! - Directories of `*.json` files (read in file-name order)
//!
//! Candidates keep their load order, which is the input order the selector
//! uses for full ties.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{FastPathError, Result};

use super::model::Experience;

/// In-memory set of experiences with unique ids
#[derive(Debug, Clone, Default)]
pub struct ExperienceCatalog {
    /// Experiences in load order
    experiences: Vec<Experience>,

    /// Index by id
    by_id: HashMap<String, usize>,
}

impl ExperienceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-parsed experiences
    pub fn from_experiences(experiences: impl IntoIterator<Item = Experience>) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.extend(experiences.into_iter().collect())?;
        Ok(catalog)
    }

    /// Add one experience, rejecting blank and duplicate ids
    pub fn add(&mut self, experience: Experience) -> Result<()> {
        self.extend(vec![experience]).map(|_| ())
    }

    /// Add a batch of experiences atomically
    ///
    /// Every id is checked (blank, already loaded, repeated within the batch)
    /// before anything is stored. On error the catalog is unchanged.
    pub fn extend(&mut self, batch: Vec<Experience>) -> Result<usize> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(batch.len());
        for experience in &batch {
            if experience.id.trim().is_empty() {
                return Err(FastPathError::InvalidExperience {
                    reason: format!("experience '{}' has a blank id", experience.title),
                });
            }
            if self.by_id.contains_key(&experience.id) || !seen.insert(experience.id.as_str()) {
                return Err(FastPathError::DuplicateExperience {
                    id: experience.id.clone(),
                });
            }
        }

        let count = batch.len();
        for experience in batch {
            self.by_id.insert(experience.id.clone(), self.experiences.len());
            self.experiences.push(experience);
        }
        Ok(count)
    }

    /// Load experiences from a JSON string; returns how many were added
    ///
    /// All or nothing: a duplicate or blank id anywhere in the input leaves
    /// the catalog unchanged.
    pub fn load_from_json(&mut self, json: &str) -> Result<usize> {
        let batch = parse_experiences(json)?;
        self.extend(batch)
    }

    /// Load experiences from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let batch = read_experience_file(path)?;
        let count = self.extend(batch)?;

        debug!(path = %path.display(), count, "loaded experiences");
        Ok(count)
    }

    /// Load every `*.json` file in a directory, in file-name order
    ///
    /// Files are parsed and checked as one batch, so a bad file leaves the
    /// catalog unchanged.
    pub fn load_from_directory<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(FastPathError::ExperienceLoadError {
                path: path.display().to_string(),
                reason: "Not a directory".to_string(),
            });
        }

        let entries = fs::read_dir(path).map_err(|e| FastPathError::ExperienceLoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FastPathError::ExperienceLoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            let file_path = entry.path();
            if file_path.is_file() && file_path.extension().is_some_and(|ext| ext == "json") {
                files.push(file_path);
            }
        }
        files.sort();

        let mut batch = Vec::new();
        for file in &files {
            batch.extend(read_experience_file(file)?);
        }
        let count = self.extend(batch)?;

        debug!(path = %path.display(), files = files.len(), count, "loaded experience directory");
        Ok(count)
    }

    /// Load from a file or a directory, whichever `path` is
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_from_directory(path)
        } else {
            self.load_from_file(path)
        }
    }

    /// Get an experience by id
    pub fn get(&self, id: &str) -> Option<&Experience> {
        self.by_id.get(id).map(|&idx| &self.experiences[idx])
    }

    /// All experiences, in load order
    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    /// Experiences with an enabled fast-intent config
    pub fn fast_intent_candidates(&self) -> impl Iterator<Item = &Experience> {
        self.experiences.iter().filter(|e| e.is_fast_intent_enabled())
    }

    pub fn len(&self) -> usize {
        self.experiences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiences.is_empty()
    }
}

/// Parse a single experience object or an array of them
fn parse_experiences(json: &str) -> Result<Vec<Experience>> {
    let value: Value = serde_json::from_str(json)?;
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
        other => Err(FastPathError::InvalidExperience {
            reason: format!("expected an object or array, got {}", json_kind(&other)),
        }),
    }
}

/// Read and parse one file; I/O and JSON failures carry the path
fn read_experience_file(path: &Path) -> Result<Vec<Experience>> {
    let content = fs::read_to_string(path).map_err(|e| FastPathError::ExperienceLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    parse_experiences(&content).map_err(|e| match e {
        FastPathError::JsonError(inner) => FastPathError::ExperienceLoadError {
            path: path.display().to_string(),
            reason: inner.to_string(),
        },
        other => other,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experience::ExperienceType;

    const TWO_EXPERIENCES: &str = r#"[
        {"id": "greet", "title": "Greeting", "type": "COMMON",
         "fastIntentConfig": {"enabled": true, "match": {"condition": {"type": "message_prefix", "value": "hi"}}}},
        {"id": "refund", "title": "Refund", "type": "REACT"}
    ]"#;

    #[test]
    fn test_load_array() {
        let mut catalog = ExperienceCatalog::new();
        assert_eq!(catalog.load_from_json(TWO_EXPERIENCES).unwrap(), 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("refund").unwrap().kind, ExperienceType::React);
        assert_eq!(catalog.experiences()[0].id, "greet");
        assert_eq!(catalog.fast_intent_candidates().count(), 1);
    }

    #[test]
    fn test_load_single_object() {
        let mut catalog = ExperienceCatalog::new();
        let count = catalog
            .load_from_json(r#"{"id": "solo", "title": "Solo"}"#)
            .unwrap();
        assert_eq!(count, 1);
        assert!(catalog.get("solo").is_some());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = ExperienceCatalog::new();
        catalog.load_from_json(TWO_EXPERIENCES).unwrap();
        let err = catalog
            .load_from_json(r#"{"id": "greet", "title": "Again"}"#)
            .unwrap_err();
        assert!(matches!(err, FastPathError::DuplicateExperience { ref id } if id == "greet"));
    }

    #[test]
    fn test_failed_batch_leaves_catalog_unchanged() {
        let mut catalog = ExperienceCatalog::new();
        let err = catalog
            .load_from_json(r#"[{"id": "a"}, {"id": "b"}, {"id": "a"}]"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_EXPERIENCE");
        assert!(catalog.is_empty());
        assert!(catalog.get("b").is_none());

        catalog.load_from_json(TWO_EXPERIENCES).unwrap();
        let err = catalog
            .load_from_json(r#"[{"id": "new"}, {"id": "refund"}]"#)
            .unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_EXPERIENCE");
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("new").is_none());
    }

    #[test]
    fn test_blank_id_in_batch_rejects_whole_batch() {
        let mut catalog = ExperienceCatalog::new();
        let err = catalog
            .extend(vec![
                Experience::new("ok", "Fine", ExperienceType::Common),
                Experience::new("", "Nameless", ExperienceType::Common),
            ])
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_EXPERIENCE");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_blank_id_rejected() {
        let err = ExperienceCatalog::from_experiences(vec![Experience::new(
            "  ",
            "Nameless",
            ExperienceType::Common,
        )])
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_EXPERIENCE");
    }

    #[test]
    fn test_scalar_json_rejected() {
        let mut catalog = ExperienceCatalog::new();
        let err = catalog.load_from_json("42").unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_missing_directory() {
        let mut catalog = ExperienceCatalog::new();
        let err = catalog.load_from_directory("/nonexistent/experiences").unwrap_err();
        assert_eq!(err.error_code(), "EXPERIENCE_LOAD_ERROR");
    }
}
