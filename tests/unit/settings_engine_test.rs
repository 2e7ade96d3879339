//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, and reset behavior.

use crm_workspace::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crm_workspace::types::errors::SettingsError;
use crm_workspace::types::render::BackgroundPolicy;
use crm_workspace::types::settings::WorkspaceSettings;
use tempfile::TempDir;

/// Engine backed by `settings.json` inside `dir`; the caller keeps `dir` alive.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, WorkspaceSettings::default());
    assert_eq!(settings.general.placeholder_title, "Loading…");
    assert_eq!(settings.routing.storage_key_prefix, "tabs_");
}

/// A change made through `set_value` is visible to a fresh engine reading the same file.
#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("api.base_url", serde_json::json!("https://crm.example.com/api"))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.api.base_url, "https://crm.example.com/api");
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine
        .set_value("general.home_title", serde_json::json!("Home"))
        .unwrap();
    engine
        .set_value("rendering.background_policy", serde_json::json!("PollAlways"))
        .unwrap();
    assert_eq!(engine.get_settings().general.home_title, "Home");

    engine.reset().unwrap();
    assert_eq!(engine.get_settings(), &WorkspaceSettings::default());

    let mut engine2 = engine_in_temp(&dir);
    assert_eq!(engine2.load().unwrap(), WorkspaceSettings::default());
}

#[test]
fn test_set_value_enum_setting() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine
        .set_value("rendering.background_policy", serde_json::json!("PollAlways"))
        .unwrap();
    assert_eq!(
        engine.get_settings().rendering.background_policy,
        BackgroundPolicy::PollAlways
    );
}

#[test]
fn test_set_value_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let result = engine.set_value("routing.nonexistent", serde_json::json!("x"));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));

    let result = engine.set_value("", serde_json::json!("x"));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_wrong_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let result = engine.set_value("api.timeout_secs", serde_json::json!("soon"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().api.timeout_secs, 10);
}

#[test]
fn test_load_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("conf").join("settings.json");
    let engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    engine.save().unwrap();
    assert!(path.exists());
}
