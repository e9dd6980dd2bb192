// ABOUTME: Tests for loading and saving toast manager configuration files

use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tempfile::TempDir;
use toast_box::{ConfigError, ManagerConfig, ToastManager};

#[test]
fn test_save_then_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let config = ManagerConfig::default()
        .with_sweep_interval(Duration::from_millis(250))
        .with_default_ttl(TimeDelta::seconds(8));

    config.save(&path).unwrap();
    let loaded = ManagerConfig::load(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    assert_eq!(ManagerConfig::load_or_default(&path).unwrap(), ManagerConfig::default());
    assert!(matches!(ManagerConfig::load(&path), Err(ConfigError::Io { .. })));
}

#[test]
fn test_zero_interval_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "sweep_interval_ms = 0\ndefault_ttl_ms = 1000\n").unwrap();

    assert!(matches!(
        ManagerConfig::load_or_default(&path),
        Err(ConfigError::InvalidInterval)
    ));
}

#[test]
fn test_manager_picks_up_config() {
    let config = ManagerConfig::default()
        .with_sweep_interval(Duration::from_secs(2))
        .with_default_ttl(TimeDelta::seconds(12));
    let manager = ToastManager::from_config(&config);

    assert_eq!(manager.sweep_interval(), Duration::from_secs(2));
    assert_eq!(manager.default_ttl(), TimeDelta::seconds(12));
}

#[tokio::test]
async fn test_zero_interval_manager_refuses_to_start() {
    let config = ManagerConfig {
        sweep_interval_ms: 0,
        ..ManagerConfig::default()
    };
    let manager = ToastManager::from_config(&config);

    assert!(manager.start().is_err());
    assert!(!manager.is_running());
}
