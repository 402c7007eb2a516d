//! # Configuration Management
//!
//! Centralized configuration for draft servers and clients.
//!
//! Everything here is fixed at session start: player count, packs per player,
//! draft name, bind address and header width are never renegotiated while a
//! draft is running.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Environment variables via `from_env()`
//! - Direct instantiation with defaults

use crate::error::{DraftError, Result};
use crate::protocol::message::{NEXT_PACK, STOP_DRAFTING};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Width of the decimal length header in bytes
pub const DEFAULT_HEADER_WIDTH: usize = 10;

/// Largest header width accepted; `usize::MAX` has 20 decimal digits
pub const MAX_HEADER_WIDTH: usize = 20;

/// Max allowed payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Default display name announced to players
pub const DEFAULT_DRAFT_NAME: &str = "Awesome draft";

/// Default listen / connect address
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:9000";

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DraftConfig {
    /// Server-specific configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Draft rules
    #[serde(default)]
    pub draft: DraftSettings,

    /// Client-specific configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DraftConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            DraftError::Configuration(format!("Failed to open config file: {e}"))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            DraftError::Configuration(format!("Failed to read config file: {e}"))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| DraftError::Configuration(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `DRAFT_*` environment variables.
    ///
    /// Unlike a missing variable, a present but unparseable one is an error.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var("DRAFT_SERVER_ADDRESS") {
            self.server.address = addr;
        }
        if let Ok(name) = std::env::var("DRAFT_NAME") {
            self.draft.name = name;
        }
        if let Some(val) = env_number("DRAFT_PLAYERS")? {
            self.draft.players = val;
        }
        if let Some(val) = env_number("DRAFT_PACKS_PER_PLAYER")? {
            self.draft.packs_per_player = val;
        }
        if let Some(val) = env_number("DRAFT_PACK_SIZE")? {
            self.draft.pack_size = val;
        }
        if let Some(val) = env_number("DRAFT_HEADER_WIDTH")? {
            self.server.header_width = val;
            self.client.header_width = val;
        }
        Ok(())
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            DraftError::Configuration(format!("Failed to serialize config: {e}"))
        })?;

        std::fs::write(path, content).map_err(|e| {
            DraftError::Configuration(format!("Failed to write config file: {e}"))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.server.validate());
        errors.extend(self.draft.validate());
        errors.extend(self.client.validate());
        errors.extend(self.logging.validate());

        if self.server.header_width != self.client.header_width {
            errors.push(format!(
                "Server header width ({}) and client header width ({}) must match",
                self.server.header_width, self.client.header_width
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DraftError::Configuration(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn env_number(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| DraftError::Configuration(format!("{key} is not a number: '{raw}'"))),
        Err(_) => Ok(None),
    }
}

fn validate_header_width(errors: &mut Vec<String>, side: &str, width: usize) {
    if width == 0 {
        errors.push(format!("{side} header width must be greater than 0"));
    } else if width > MAX_HEADER_WIDTH {
        errors.push(format!(
            "{side} header width too large: {width} (maximum: {MAX_HEADER_WIDTH})"
        ));
    }
}

fn validate_address(errors: &mut Vec<String>, side: &str, address: &str) {
    if address.is_empty() {
        errors.push(format!("{side} address cannot be empty"));
    } else if address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(format!(
            "Invalid {} address format: '{address}' (expected format: '0.0.0.0:9000')",
            side.to_lowercase()
        ));
    }
}

/// Server-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address including the bind port (e.g., "0.0.0.0:9000")
    pub address: String,

    /// Width of the framing length header
    pub header_width: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::from(DEFAULT_ADDRESS),
            header_width: DEFAULT_HEADER_WIDTH,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_address(&mut errors, "Server", &self.address);
        validate_header_width(&mut errors, "Server", self.header_width);
        errors
    }
}

/// Rules of the draft itself
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DraftSettings {
    /// Display name announced to every player
    pub name: String,

    /// Number of players the server waits for before starting
    pub players: usize,

    /// Packs each player opens over the whole draft
    pub packs_per_player: usize,

    /// Cards per pack
    pub pack_size: usize,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_DRAFT_NAME),
            players: 2,
            packs_per_player: 2,
            pack_size: 15,
        }
    }
}

impl DraftSettings {
    /// Total number of packs the pack source must produce
    pub fn total_packs(&self) -> usize {
        self.packs_per_player * self.players
    }

    /// Validate draft rules
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Draft name cannot be empty".to_string());
        } else if self.name == NEXT_PACK || self.name == STOP_DRAFTING {
            errors.push(format!("Draft name '{}' is a reserved sentinel", self.name));
        }

        if self.players == 0 {
            errors.push("Player count must be greater than 0".to_string());
        }

        if self.packs_per_player == 0 {
            errors.push("Packs per player must be greater than 0".to_string());
        } else if self.players > 0 && self.packs_per_player != self.players {
            // each pack group holds packs_per_player packs and rotates among all players
            errors.push(format!(
                "Packs per player ({}) must equal player count ({}) for round-robin rotation",
                self.packs_per_player, self.players
            ));
        }

        if self.pack_size == 0 {
            errors.push("Pack size must be greater than 0".to_string());
        }

        errors
    }
}

/// Client-specific configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target server address
    pub address: String,

    /// Width of the framing length header; must match the server
    pub header_width: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: String::from(DEFAULT_ADDRESS),
            header_width: DEFAULT_HEADER_WIDTH,
        }
    }
}

impl ClientConfig {
    /// Validate client configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        validate_address(&mut errors, "Client", &self.address);
        validate_header_width(&mut errors, "Client", self.header_width);
        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("booster-draft"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
