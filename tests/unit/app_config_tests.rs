/*!
 * Tests for application configuration functionality
 */

use subtrack::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.request_language, "en");
    assert_eq!(config.ui_language, "en");
    assert_eq!(config.network.candidate_timeout_ms, 5000);
    assert_eq!(config.network.fetch_timeout_ms, 5000);
    assert!(config.network.service_endpoint.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.ui_language = "".to_string();
    assert!(config.validate().is_err());
    config.ui_language = "ru".to_string();
    assert!(config.validate().is_ok());

    config.request_language = "zz".to_string();
    assert!(config.validate().is_err());
    config.request_language = "en-US".to_string();
    assert!(config.validate().is_ok());

    config.network.candidate_timeout_ms = 0;
    assert!(config.validate().is_err());
    config.network.candidate_timeout_ms = 1000;

    config.network.service_endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.network.service_endpoint = "ftp://subs.example".to_string();
    assert!(config.validate().is_err());
    config.network.service_endpoint = "https://subs.example/api/subtitles".to_string();
    assert!(config.validate().is_ok());
}

/// Test loading a partial config file fills in defaults
#[test]
fn test_config_load_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "config.json",
        r#"{"ui_language": "ru", "network": {"candidate_timeout_ms": 250}, "log_level": "debug"}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.ui_language, "ru");
    assert_eq!(config.request_language, "en");
    assert_eq!(config.network.candidate_timeout_ms, 250);
    assert_eq!(config.network.fetch_timeout_ms, 5000);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

/// Test a missing file means defaults
#[test]
fn test_config_load_withMissingFile_shouldReturnDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let config = Config::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

/// Test an unreadable file is an error
#[test]
fn test_config_load_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "config.json", "{ not json").unwrap();
    assert!(Config::load(&path).is_err());
}

/// Test save then load
#[test]
fn test_config_save_shouldBeLoadable() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.network.service_endpoint = "https://subs.example".to_string();
    config.save(&path).unwrap();

    assert_eq!(Config::load(&path).unwrap(), config);
}
