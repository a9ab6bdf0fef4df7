//! Loading experiences and engine config from disk.

use std::fs;

use fastpath_core::{
    ErrorCategory, ExperienceCatalog, FastIntentSelector, FastPathConfig, FastPathError,
    MatchContext,
};
use tempfile::TempDir;

fn experience_json(id: &str, priority: i32, prefix: &str) -> String {
    serde_json::json!({
        "id": id,
        "title": format!("{} title", id),
        "type": "COMMON",
        "fastIntentConfig": {
            "enabled": true,
            "priority": priority,
            "match": {"condition": {"type": "message_prefix", "value": prefix}}
        }
    })
    .to_string()
}

#[test]
fn test_load_directory_in_file_name_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.json"), experience_json("second", 0, "hi")).unwrap();
    fs::write(dir.path().join("a.json"), experience_json("first", 0, "hi")).unwrap();
    fs::write(dir.path().join("notes.txt"), "not an experience").unwrap();

    let mut catalog = ExperienceCatalog::new();
    let count = catalog.load_path(dir.path()).unwrap();

    assert_eq!(count, 2);
    let ids: Vec<&str> = catalog.experiences().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["first", "second"]);
}

#[test]
fn test_load_single_file_with_array() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("experiences.json");
    let body = format!(
        "[{}, {}]",
        experience_json("greet", 1, "hello"),
        experience_json("bye", 2, "bye")
    );
    fs::write(&path, body).unwrap();

    let mut catalog = ExperienceCatalog::new();
    assert_eq!(catalog.load_path(&path).unwrap(), 2);
    assert!(catalog.get("greet").is_some());

    let selector = FastIntentSelector::default();
    let best = selector.select_best_match(catalog.experiences(), &MatchContext::new("hello you"));
    assert_eq!(best.unwrap().id, "greet");
}

#[test]
fn test_duplicate_id_across_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), experience_json("same", 0, "x")).unwrap();
    fs::write(dir.path().join("b.json"), experience_json("same", 1, "y")).unwrap();

    let mut catalog = ExperienceCatalog::new();
    let err = catalog.load_from_directory(dir.path()).unwrap_err();
    assert!(matches!(err, FastPathError::DuplicateExperience { ref id } if id == "same"));
    assert_eq!(err.category(), ErrorCategory::Conflict);
}

#[test]
fn test_failed_directory_load_leaves_catalog_unchanged() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), experience_json("first", 0, "x")).unwrap();
    fs::write(dir.path().join("b.json"), experience_json("second", 0, "y")).unwrap();
    fs::write(dir.path().join("c.json"), "{ not json").unwrap();

    let mut catalog = ExperienceCatalog::new();
    catalog.load_from_json(&experience_json("existing", 0, "z")).unwrap();

    let err = catalog.load_from_directory(dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "EXPERIENCE_LOAD_ERROR");
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get("first").is_none());

    fs::write(dir.path().join("c.json"), experience_json("existing", 1, "w")).unwrap();
    let err = catalog.load_from_directory(dir.path()).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_EXPERIENCE");
    let ids: Vec<&str> = catalog.experiences().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["existing"]);
}

#[test]
fn test_duplicate_within_one_file_is_all_or_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("batch.json");
    let body = format!(
        "[{}, {}, {}]",
        experience_json("a", 0, "x"),
        experience_json("b", 0, "y"),
        experience_json("a", 1, "z")
    );
    fs::write(&path, body).unwrap();

    let mut catalog = ExperienceCatalog::new();
    let err = catalog.load_from_file(&path).unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_EXPERIENCE");
    assert_eq!(catalog.len(), 0);
}

#[test]
fn test_malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let mut catalog = ExperienceCatalog::new();
    let err = catalog.load_from_file(&path).unwrap_err();
    match err {
        FastPathError::ExperienceLoadError { path: reported, .. } => {
            assert!(reported.ends_with("broken.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_path_is_load_error() {
    let dir = TempDir::new().unwrap();
    let mut catalog = ExperienceCatalog::new();

    let err = catalog.load_path(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.error_code(), "EXPERIENCE_LOAD_ERROR");
    assert!(catalog.is_empty());
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fastpath.json");
    fs::write(&path, r#"{"enabled": false, "regexSizeLimit": 4096}"#).unwrap();

    let config = FastPathConfig::from_file(&path).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.regex_size_limit, 4096);

    fs::write(&path, r#"{"regexSizeLimit": 0}"#).unwrap();
    let err = FastPathConfig::from_file(&path).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Validation);
}
