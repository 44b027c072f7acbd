use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use crate::kernel::constants;
use crate::storage::config::{ConfigFormat, EventsConfig, load_events_config};
use crate::storage::error::StorageSystemError;

#[test]
fn test_config_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("events.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("events.YAML")), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_path(Path::new("events.yml")), Some(ConfigFormat::Yaml));
    assert_eq!(ConfigFormat::from_path(Path::new("events.toml")), Some(ConfigFormat::Toml));
    assert_eq!(ConfigFormat::from_path(Path::new("events.ini")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("events")), None);
    assert_eq!(ConfigFormat::Yaml.extension(), "yaml");
}

#[test]
fn test_events_config_defaults() {
    let config = EventsConfig::default();
    assert!(!config.debug_sent);
    assert!(!config.debug_caught);
    assert!(config.dynamic_enabled);
    assert_eq!(config.dynamic_dir, None);
}

#[test]
fn test_load_events_config_all_formats() {
    let temp_dir = tempdir().unwrap();

    let json_path = temp_dir.path().join("events.json");
    fs::write(&json_path, r#"{"debug_sent": true, "dynamic_dir": "hooks"}"#).unwrap();
    let config = load_events_config(&json_path).unwrap();
    assert!(config.debug_sent);
    assert!(!config.debug_caught, "missing fields fall back to defaults");
    assert_eq!(config.dynamic_dir, Some(PathBuf::from("hooks")));

    let yaml_path = temp_dir.path().join("events.yaml");
    fs::write(&yaml_path, "debug_caught: true\ndynamic_enabled: false\n").unwrap();
    let config = load_events_config(&yaml_path).unwrap();
    assert!(config.debug_caught);
    assert!(!config.dynamic_enabled);

    let toml_path = temp_dir.path().join("events.toml");
    fs::write(&toml_path, "debug_sent = true\ndebug_caught = true\n").unwrap();
    let config = load_events_config(&toml_path).unwrap();
    assert!(config.debug_sent && config.debug_caught);
}

#[test]
fn test_load_events_config_errors() {
    let temp_dir = tempdir().unwrap();

    let ini_path = temp_dir.path().join("events.ini");
    fs::write(&ini_path, "debug_sent=1").unwrap();
    assert!(matches!(
        load_events_config(&ini_path),
        Err(StorageSystemError::UnsupportedConfigFormat(_))
    ));

    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(
        load_events_config(&missing),
        Err(StorageSystemError::FileNotFound(path)) if path == missing
    ));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    match load_events_config(&broken) {
        Err(StorageSystemError::DeserializationError { format, .. }) => assert_eq!(format, "JSON"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_dynamic_root_resolution() {
    let app_dir = Path::new("/srv/app");

    let config = EventsConfig::default();
    assert_eq!(config.dynamic_root(app_dir), app_dir.join(constants::DYNAMIC_EVENTS_DIR));

    let config = EventsConfig { dynamic_dir: Some(PathBuf::from("hooks")), ..EventsConfig::default() };
    assert_eq!(config.dynamic_root(app_dir), PathBuf::from("/srv/app/hooks"));

    let config = EventsConfig { dynamic_dir: Some(PathBuf::from("/etc/herald")), ..EventsConfig::default() };
    assert_eq!(config.dynamic_root(app_dir), PathBuf::from("/etc/herald"));
}
