use cashflow_core::config::{ConfigManager, EngineConfig};
use tempfile::TempDir;

#[test]
fn missing_file_loads_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_path(dir.path().join("absent.json"));
    assert_eq!(manager.load().unwrap(), EngineConfig::default());
}

#[test]
fn save_then_load_preserves_values() {
    let dir = TempDir::new().expect("temp dir");
    let manager = ConfigManager::with_path(dir.path().join("nested").join("config.json"));
    let config = EngineConfig {
        horizon_days: 365,
        lookback_days: 60,
        recurrence_batch: 24,
        projection_label: "(forecast)".into(),
    };
    manager.save(&config).unwrap();
    assert!(manager.path().exists());
    assert!(!manager.path().with_extension("json.tmp").exists());
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn invalid_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"recurrence_batch": 0}"#).unwrap();
    assert!(ConfigManager::with_path(path).load().is_err());
}
