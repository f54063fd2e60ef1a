#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Configuration loading and validation tests.

use std::time::Duration;
use world_client::config::{ClientConfig, DEFAULT_SERVER_PORT};

#[test]
fn test_defaults_are_valid() {
    let config = ClientConfig::default();
    assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
    assert_eq!(config.world, "buy");
    assert!(config.validate().is_empty());
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_from_toml_full() {
    let config = ClientConfig::from_toml(
        r#"
        server_host = "play.example.net"
        server_port = 10002
        co_id = "co-77"
        token = "tok-77"
        world = "plaza"
        sync_interval = 1500
        settle_delay = 500
        "#,
    )
    .unwrap();

    assert_eq!(config.server_host, "play.example.net");
    assert_eq!(config.server_port, 10002);
    assert_eq!(config.co_id, "co-77");
    assert_eq!(config.token, "tok-77");
    assert_eq!(config.world, "plaza");
    assert_eq!(config.sync_interval, Duration::from_millis(1500));
    assert_eq!(config.settle_delay, Duration::from_millis(500));
}

#[test]
fn test_from_toml_partial_uses_defaults() {
    let config = ClientConfig::from_toml(r#"server_host = "198.51.100.9""#).unwrap();
    assert_eq!(config.server_host, "198.51.100.9");
    assert_eq!(config.server_port, DEFAULT_SERVER_PORT);
    assert_eq!(config.sync_interval, Duration::from_millis(2000));
}

#[test]
fn test_from_toml_invalid() {
    assert!(ClientConfig::from_toml("server_port = \"not a port\"").is_err());
}

#[test]
fn test_toml_roundtrip() {
    let config = ClientConfig {
        server_host: "host.example".into(),
        co_id: "c".into(),
        ..ClientConfig::default()
    };
    let toml = toml::to_string(&config).unwrap();
    let back = ClientConfig::from_toml(&toml).unwrap();
    assert_eq!(back.server_host, config.server_host);
    assert_eq!(back.co_id, config.co_id);
    assert_eq!(back.sync_interval, config.sync_interval);
}

#[test]
fn test_empty_host_rejected() {
    let config = ClientConfig {
        server_host: String::new(),
        ..ClientConfig::default()
    };
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("host")));
    assert!(config.validate_strict().is_err());
}

#[test]
fn test_zero_port_rejected() {
    let config = ClientConfig {
        server_port: 0,
        ..ClientConfig::default()
    };
    assert!(!config.validate().is_empty());
}

#[test]
fn test_empty_world_rejected() {
    let config = ClientConfig {
        world: String::new(),
        ..ClientConfig::default()
    };
    assert!(!config.validate().is_empty());
}

#[test]
fn test_sync_interval_bounds() {
    let too_short = ClientConfig {
        sync_interval: Duration::from_millis(10),
        ..ClientConfig::default()
    };
    assert!(!too_short.validate().is_empty());

    let too_long = ClientConfig {
        sync_interval: Duration::from_secs(120),
        ..ClientConfig::default()
    };
    assert!(!too_long.validate().is_empty());
}

#[test]
fn test_empty_credentials_allowed() {
    // empty credentials register a fresh account; that is a supported setup
    let config = ClientConfig {
        co_id: String::new(),
        token: String::new(),
        ..ClientConfig::default()
    };
    assert!(config.validate().is_empty());
}
