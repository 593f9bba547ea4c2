// Config loading, env overrides and validation tests

use dockerstats::config::{AppConfig, MIN_INTERVAL_SECS};
use std::collections::HashMap;

const VALID_CONFIG: &str = r#"
[server]
port = 9487
host = "0.0.0.0"

[collection]
interval_secs = 15

[runtime]
host = "10.0.0.5"
port = 2375

[metrics]
collect_default = true
"#;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 9487);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.collection.interval_secs, 15);
    assert_eq!(
        config.runtime.remote_address().as_deref(),
        Some("tcp://10.0.0.5:2375")
    );
    assert!(config.metrics.collect_default);
}

#[test]
fn test_config_empty_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.server.port, 9487);
    assert_eq!(config.collection.interval_secs, 15);
    assert!(config.runtime.remote_address().is_none());
    assert!(!config.metrics.collect_default);
}

#[test]
fn test_config_interval_below_minimum_is_clamped() {
    let cfg = VALID_CONFIG.replace("interval_secs = 15", "interval_secs = 1");
    let config = AppConfig::load_from_str(&cfg).expect("clamped, not rejected");
    assert_eq!(config.collection.interval_secs, MIN_INTERVAL_SECS);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 9487", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_runtime_host_without_port_falls_back_to_local() {
    let config = AppConfig::load_from_str("[runtime]\nhost = \"10.0.0.5\"\n")
        .expect("incomplete remote endpoint is not fatal");
    assert!(config.runtime.remote_address().is_none());
    assert!(config.runtime.host.is_none());
}

#[test]
fn test_config_runtime_port_without_host_falls_back_to_local() {
    let config = AppConfig::load_from_str("[runtime]\nport = 2375\n").expect("load_from_str");
    assert!(config.runtime.remote_address().is_none());
    assert!(config.runtime.port.is_none());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_env_overrides() {
    let mut config = AppConfig::load_from_str("").unwrap();
    config
        .apply_env(env(&[
            ("DOCKERSTATS_PORT", "9500"),
            ("DOCKERSTATS_INTERVAL", "30"),
            ("DOCKERSTATS_HOSTIP", "192.168.1.10"),
            ("DOCKERSTATS_HOSTPORT", "2376"),
            ("DOCKERSTATS_DEFAULTMETRICS", "true"),
        ]))
        .unwrap();
    assert_eq!(config.server.port, 9500);
    assert_eq!(config.collection.interval_secs, 30);
    assert_eq!(
        config.runtime.remote_address().as_deref(),
        Some("tcp://192.168.1.10:2376")
    );
    assert!(config.metrics.collect_default);
}

#[test]
fn test_config_env_empty_host_and_zero_port_mean_local() {
    let mut config = AppConfig::load_from_str("").unwrap();
    config
        .apply_env(env(&[
            ("DOCKERSTATS_HOSTIP", ""),
            ("DOCKERSTATS_HOSTPORT", "0"),
        ]))
        .unwrap();
    assert!(config.runtime.remote_address().is_none());
}

#[test]
fn test_config_env_rejects_non_numeric_port() {
    let mut config = AppConfig::load_from_str("").unwrap();
    let err = config
        .apply_env(env(&[("DOCKERSTATS_PORT", "http")]))
        .unwrap_err();
    assert!(err.to_string().contains("DOCKERSTATS_PORT"));
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 9487);
    assert_eq!(config.runtime.port, Some(2375));
}
