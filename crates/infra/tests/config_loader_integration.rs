//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and the
//! environment.

use std::io::Write;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use opscope_domain::{LogFormat, OpscopeError};
use opscope_infra::config;
use tempfile::NamedTempFile;

static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "log": { "level": "info", "format": "json" },
            "metrics": {
                "enabled": true,
                "host": "statsd.local",
                "port": 8126,
                "prefix": "prod.orders",
                "max_datagram_size": 1432
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("JSON config loads");

    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.format, LogFormat::Json);
    assert!(config.metrics.enabled);
    assert_eq!(config.metrics.host, "statsd.local");
    assert_eq!(config.metrics.port, 8126);
    assert_eq!(config.metrics.prefix, "prod.orders");
    assert_eq!(config.metrics.max_datagram_size, 1432);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_toml_file_with_defaults() {
    let path = write_config(
        r#"
[log]
format = "compact"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("TOML config loads");

    assert_eq!(config.log.level, "DEBUG");
    assert_eq!(config.log.format, LogFormat::Compact);
    assert!(!config.metrics.enabled);
    assert_eq!(config.metrics.host, "localhost");
    assert_eq!(config.metrics.port, 8125);
    assert_eq!(config.metrics.prefix, "dev.app");
    assert_eq!(config.metrics.max_datagram_size, 512);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_toml_is_config_error() {
    let path = write_config("[metrics\nport = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(OpscopeError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_wrong_field_type_is_config_error() {
    let path = write_config(r#"{ "metrics": { "port": "eighty" } }"#, "json");

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Invalid JSON format"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_statsd_toggle_truthy_values() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

    let cases = [("OK", true), ("Yes", true), ("true", true), ("1", false), ("off", false)];
    for (value, expected) in cases {
        std::env::set_var("STATSD_ON", value);
        let config = config::load_from_env().expect("env config loads");
        assert_eq!(config.metrics.enabled, expected, "STATSD_ON={value}");
    }

    std::env::remove_var("STATSD_ON");
}

#[test]
fn test_dotenv_missing_file_is_not_an_error() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let dir = tempfile::tempdir().expect("tempdir");
    let previous = std::env::current_dir().expect("cwd");

    std::env::set_current_dir(dir.path()).expect("chdir");
    let loaded = config::load_dotenv();
    std::env::set_current_dir(previous).expect("restore cwd");

    assert!(loaded.is_none());
}

#[test]
fn test_dotenv_seeds_environment() {
    let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "STATSD_PREFIX=from.dotenv\n").expect("write .env");
    std::env::remove_var("STATSD_PREFIX");
    let previous = std::env::current_dir().expect("cwd");

    std::env::set_current_dir(dir.path()).expect("chdir");
    let loaded = config::load_dotenv();
    std::env::set_current_dir(previous).expect("restore cwd");

    assert!(loaded.is_some());
    let config = config::load_from_env().expect("env config loads");
    assert_eq!(config.metrics.prefix, "from.dotenv");

    std::env::remove_var("STATSD_PREFIX");
}
