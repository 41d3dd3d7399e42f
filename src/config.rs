//! # Configuration (ambient stack, §10.3)
//!
//! Carries the configuration surface §6 describes: radio pin assignments,
//! device identity, region selector, and the operational knobs named
//! explicitly in §5/§8 (join retry budget, confirmed-uplink default,
//! periodic-rejoin interval). Loaded from a TOML file by the CLI front end;
//! library callers may also build a `Config` directly.

use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_JOIN_MAX_TRIES, RADIO_BUSY_PIN, RADIO_IRQ_PIN, RADIO_RESET_PIN, RADIO_RX_ENABLE_PIN,
    RADIO_SPI_BUS_ID, RADIO_SPI_CS_ID, RADIO_TX_ENABLE_PIN,
};
use crate::region::Region;

/// Errors loading or validating a `Config`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid hex in field {field}: {source}")]
    Hex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },
}

/// SX126x pin and bus configuration (§6 "Configuration surface").
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    pub spi_bus_id: u8,
    pub spi_cs_id: u8,
    pub reset_pin: i32,
    pub busy_pin: i32,
    /// `-1` disables interrupt-driven polling in favor of the software tick.
    pub irq_pin: i32,
    /// `-1` when the front-end has no separate TX-enable line.
    pub tx_enable_pin: i32,
    /// `-1` when the front-end has no separate RX-enable line.
    pub rx_enable_pin: i32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            spi_bus_id: RADIO_SPI_BUS_ID,
            spi_cs_id: RADIO_SPI_CS_ID,
            reset_pin: RADIO_RESET_PIN,
            busy_pin: RADIO_BUSY_PIN,
            irq_pin: RADIO_IRQ_PIN,
            tx_enable_pin: RADIO_TX_ENABLE_PIN,
            rx_enable_pin: RADIO_RX_ENABLE_PIN,
        }
    }
}

/// Top-level device configuration: identity, region and the engine's
/// operational knobs, plus the nested radio pin assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dev_eui: String,
    pub app_eui: String,
    pub app_key: String,

    pub region: Region,

    #[serde(default)]
    pub radio: RadioConfig,

    /// Join attempts per `join()` call before `JoinMaxTryError` fires.
    #[serde(default = "default_join_max_tries")]
    pub join_max_tries: u8,

    /// Whether uplinks request a network ack by default.
    #[serde(default)]
    pub confirmed_uplink_default: bool,

    /// Periodic-rejoin interval in seconds; `0` disables periodic rejoin
    /// (§4.6 "Periodic rejoin" — the application layer drives this, the
    /// engine only supports it via `join(forced=true)`).
    #[serde(default)]
    pub rejoin_interval_secs: u64,

    pub persistence_path: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_join_max_tries() -> u8 {
    DEFAULT_JOIN_MAX_TRIES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Decodes `dev_eui` from hex into its 8-byte form.
    pub fn dev_eui_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        hex::decode(&self.dev_eui).map_err(|source| ConfigError::Hex {
            field: "dev_eui",
            source,
        })
    }

    /// Decodes `app_eui` from hex into its 8-byte form.
    pub fn app_eui_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        hex::decode(&self.app_eui).map_err(|source| ConfigError::Hex {
            field: "app_eui",
            source,
        })
    }

    /// Decodes `app_key` from hex into its 16-byte form.
    pub fn app_key_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        hex::decode(&self.app_key).map_err(|source| ConfigError::Hex {
            field: "app_key",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        dev_eui = "1d42fbec13160990"
        app_eui = "1d42fbec13160990"
        app_key = "4fe6e906d37fd200f25f82f7df6ba0dd"
        region = "Eu868"
        persistence_path = "devices.json"
    "#;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.join_max_tries, DEFAULT_JOIN_MAX_TRIES);
        assert!(!config.confirmed_uplink_default);
        assert_eq!(config.radio.spi_bus_id, RADIO_SPI_BUS_ID);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn decodes_hex_identity_fields() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.dev_eui_bytes().unwrap(), hex::decode("1d42fbec13160990").unwrap());
        assert_eq!(config.app_key_bytes().unwrap().len(), 16);
    }

    #[test]
    fn rejects_malformed_hex() {
        let bad = SAMPLE.replace("1d42fbec13160990", "not-hex-at-all!!");
        let config: Config = toml::from_str(&bad).unwrap();
        assert!(config.dev_eui_bytes().is_err());
    }

    #[test]
    fn missing_file_errors() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
