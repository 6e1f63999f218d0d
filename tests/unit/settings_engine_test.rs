//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface:
//! default loading, partial files, value persistence and reset.

use gove::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use gove::types::errors::SettingsError;
use gove::types::settings::{ShellSettings, DEFAULT_USER_AGENT};
use tempfile::TempDir;

/// Helper: a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    SettingsEngine::new(Some(dir.path().join("settings.json")))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, ShellSettings::default());
    assert_eq!(settings.homepage, "https://www.google.com");
    assert_eq!(settings.startup_label, "Google Search");
    assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    assert!(
        !dir.path().join("settings.json").exists(),
        "loading must not create the file"
    );
}

#[test]
fn test_partial_file_fills_in_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{ "homepage": "https://example.org" }"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.homepage, "https://example.org");
    assert_eq!(settings.new_tab_url, ShellSettings::default().new_tab_url);
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn test_malformed_file_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.load().unwrap_err();

    assert!(matches!(err, SettingsError::Serialization(_)));
}

#[test]
fn test_set_value_persists_immediately() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine
        .set_value("homepage", serde_json::json!("https://example.com"))
        .unwrap();

    assert_eq!(engine.get_settings().homepage, "https://example.com");
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap().homepage, "https://example.com");
}

#[test]
fn test_set_value_with_wrong_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.set_value("homepage", serde_json::json!(42)).unwrap_err();

    assert!(matches!(err, SettingsError::Serialization(_)));
    assert_eq!(engine.get_settings(), &ShellSettings::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let err = engine.set_value("theme", serde_json::json!("dark")).unwrap_err();

    assert!(err.to_string().contains("theme"));
}

#[test]
fn test_download_dir_round_trips() {
    let dir = TempDir::new().unwrap();
    let downloads = dir.path().join("dl");
    let mut engine = engine_in_temp(&dir);

    engine
        .set_value("download_dir", serde_json::json!(downloads))
        .unwrap();

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.download_dir.as_deref(), Some(downloads.as_path()));
    assert_eq!(settings.resolved_download_dir(), downloads);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine
        .set_value("startup_label", serde_json::json!("Start"))
        .unwrap();

    engine.reset().unwrap();

    assert_eq!(engine.get_settings(), &ShellSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), ShellSettings::default());
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");
    let engine = SettingsEngine::new(Some(path.clone()));

    engine.save().unwrap();

    assert!(path.exists());
    assert_eq!(engine.get_config_path(), path.as_path());
}
