//! # lorawan-mac - An End-Device LoRaWAN 1.0.2 MAC Layer
//!
//! `lorawan-mac` implements the device-side MAC layer of LoRaWAN 1.0.2 for a
//! Semtech SX126x radio: OTAA join, uplink/downlink framing and crypto,
//! dual RX-window scheduling and MAC-command bookkeeping, for EU868 and
//! US915. The device runs Class C, so RX2 stays open whenever no other
//! window is active.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! lorawan-mac = "0.1.0"
//! ```
//!
//! ```no_run
//! use std::sync::Arc;
//! use lorawan_mac::{init_logger, Callbacks, JsonFileStore, MacEngine, Region};
//! use lorawan_mac::radio::mock::MockRadioDriver;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! init_logger();
//! let store = Arc::new(JsonFileStore::open("devices.json")?);
//! let engine = MacEngine::new(
//!     MockRadioDriver::new(),
//!     store,
//!     &hex::decode("1d42fbec13160990")?,
//!     &hex::decode("1d42fbec13160990")?,
//!     &hex::decode("4fe6e906d37fd200f25f82f7df6ba0dd")?,
//!     Region::Eu868,
//! )
//! .await?;
//!
//! engine.set_callbacks(Callbacks::default()).await;
//! engine.join(3, false).await;
//! # Ok(())
//! # }
//! ```

pub mod callbacks;
pub mod codec;
pub mod config;
pub mod constants;
pub mod device;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mac_command;
pub mod persistence;
pub mod radio;
pub mod region;

pub use callbacks::{
    Callbacks, JoinCallback, JoinStatus, ReceiveCallback, ReceiveStatus, TransmitCallback,
    TransmitStatus,
};
pub use config::{Config, ConfigError, RadioConfig};
pub use device::{DeviceError, DeviceRecord, Key16};
pub use engine::MacEngine;
pub use error::EngineError;
pub use logging::{init_logger, log_debug, log_error, log_info, log_warn};
pub use persistence::JsonFileStore;
pub use radio::{LinkParams, RadioDriver, RadioStatus};
pub use region::{Region, SpreadingFactor};
