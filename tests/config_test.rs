//! Tests for layered settings files

use std::path::PathBuf;

use tempfile::TempDir;

use kinforest::application::ApplicationError;
use kinforest::config::{local_config_path, OutputFormat, Settings};
use kinforest::domain::UnknownRelationPolicy;
use kinforest::LayoutService;

fn write_local_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = local_config_path(dir.path());
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_local_config_file_when_loading_file_then_keys_override_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_local_config(&temp, "unknown_relations = \"reject\"\noutput = \"json\"\n");

    // Act
    let settings = Settings::load_file(&path).unwrap();

    // Assert
    assert_eq!(settings.unknown_relations, UnknownRelationPolicy::Reject);
    assert_eq!(settings.output, OutputFormat::Json);
    assert!(settings.color);
}

#[test]
fn given_empty_config_file_when_loading_file_then_defaults() {
    let temp = TempDir::new().unwrap();
    let path = write_local_config(&temp, "");

    let settings = Settings::load_file(&path).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_invalid_value_when_loading_file_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = write_local_config(&temp, "output = \"svg\"\n");

    let result = Settings::load_file(&path);

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_missing_file_when_loading_file_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load_file(&temp.path().join("nope.toml"));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_dir_without_local_config_when_loading_then_succeeds() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(temp.path()));

    assert!(result.is_ok(), "load failed: {:?}", result.err());
}

#[test]
fn given_reject_setting_when_creating_service_then_unknown_relations_fail() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_local_config(&temp, "unknown_relations = \"reject\"\n");
    let settings = Settings::load_file(&path).unwrap();
    let snapshot: kinforest::domain::Snapshot = serde_json::from_str(
        r#"{"entities": [{"name": "a"}, {"name": "b"}],
            "relations": [{"kind": "sibling", "from": "a", "to": "b"}]}"#,
    )
    .unwrap();

    // Act
    let result = LayoutService::new(&settings).layout_snapshot(&snapshot);

    // Assert
    assert!(result.is_err());
}
