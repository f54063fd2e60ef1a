//! # Configuration Management
//!
//! Centralized configuration for the protocol client.
//!
//! This module provides the process-start configuration surface: target
//! server, login identity, destination world, and the protocol timing
//! knobs. Protocol constants that are part of the wire contract live here
//! as consts.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment variables via `from_env()` (prefix `WORLD_CLIENT_`)
//! - Direct instantiation with defaults

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ProtocolError, Result};

/// Default game-server port
pub const DEFAULT_SERVER_PORT: u16 = 10001;

/// Max allowed frame size (16 MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Max allowed decompressed world snapshot size (16 MB)
pub const MAX_SNAPSHOT_SIZE: usize = 16 * 1024 * 1024;

/// Default interval between outbound time-sync packets
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_millis(2000);

/// Default delay before spawning into a freshly loaded world
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Client configuration: connection target, login identity, destination
/// world, and timing knobs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Game-server hostname or IP address
    pub server_host: String,

    /// Game-server port
    pub server_port: u16,

    /// Account identifier. May be empty, in which case the server
    /// registers a fresh account.
    pub co_id: String,

    /// Account token paired with `co_id`
    pub token: String,

    /// Destination world to join after login
    pub world: String,

    /// Interval between time-sync packets while connected
    #[serde(with = "duration_serde")]
    pub sync_interval: Duration,

    /// How long a world must have been loaded before spawning
    #[serde(with = "duration_serde")]
    pub settle_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_host: String::from("127.0.0.1"),
            server_port: DEFAULT_SERVER_PORT,
            co_id: String::new(),
            token: String::new(),
            world: String::from("buy"),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables, starting from
    /// defaults. Recognized variables:
    /// `WORLD_CLIENT_SERVER_HOST`, `WORLD_CLIENT_SERVER_PORT`,
    /// `WORLD_CLIENT_CO_ID`, `WORLD_CLIENT_TOKEN`, `WORLD_CLIENT_WORLD`,
    /// `WORLD_CLIENT_SYNC_INTERVAL_MS`, `WORLD_CLIENT_SETTLE_DELAY_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("WORLD_CLIENT_SERVER_HOST") {
            config.server_host = host;
        }
        if let Ok(port) = std::env::var("WORLD_CLIENT_SERVER_PORT") {
            if let Ok(val) = port.parse::<u16>() {
                config.server_port = val;
            }
        }
        if let Ok(co_id) = std::env::var("WORLD_CLIENT_CO_ID") {
            config.co_id = co_id;
        }
        if let Ok(token) = std::env::var("WORLD_CLIENT_TOKEN") {
            config.token = token;
        }
        if let Ok(world) = std::env::var("WORLD_CLIENT_WORLD") {
            config.world = world;
        }
        if let Ok(interval) = std::env::var("WORLD_CLIENT_SYNC_INTERVAL_MS") {
            if let Ok(val) = interval.parse::<u64>() {
                config.sync_interval = Duration::from_millis(val);
            }
        }
        if let Ok(delay) = std::env::var("WORLD_CLIENT_SETTLE_DELAY_MS") {
            if let Ok(val) = delay.parse::<u64>() {
                config.settle_delay = Duration::from_millis(val);
            }
        }

        config
    }

    /// Validate the configuration for common issues.
    ///
    /// Returns a list of validation errors. Empty list means the
    /// configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server_host.is_empty() {
            errors.push("Server host cannot be empty".to_string());
        }
        if self.server_port == 0 {
            errors.push("Server port cannot be 0".to_string());
        }
        if self.world.is_empty() {
            errors.push("Destination world cannot be empty".to_string());
        }
        if self.sync_interval.as_millis() < 100 {
            errors.push("Sync interval too short (minimum: 100ms)".to_string());
        } else if self.sync_interval.as_secs() > 60 {
            errors.push("Sync interval too long (maximum: 60s)".to_string());
        }
        if self.settle_delay.as_secs() > 60 {
            errors.push("Settle delay too long (maximum: 60s)".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Helper module for Duration serialization/deserialization (millis)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
