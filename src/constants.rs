//! LoRaWAN 1.0.2 end-device constants.
//!
//! Radio pin defaults, receive-window delays and wire configuration taken
//! from the reference firmware's settings table.

use std::time::Duration;

/// Default SPI bus id for the SX126x (Raspberry Pi SPI0).
pub const RADIO_SPI_BUS_ID: u8 = 0;
/// Default SPI chip-select id.
pub const RADIO_SPI_CS_ID: u8 = 0;
/// Default reset GPIO pin (BCM numbering).
pub const RADIO_RESET_PIN: i32 = 16;
/// Default BUSY GPIO pin.
pub const RADIO_BUSY_PIN: i32 = 6;
/// IRQ pin; `-1` disables interrupt-driven polling in favor of a software tick.
pub const RADIO_IRQ_PIN: i32 = -1;
/// TX-enable pin; `-1` when the front-end has no separate enable line.
pub const RADIO_TX_ENABLE_PIN: i32 = -1;
/// RX-enable pin; `-1` when the front-end has no separate enable line.
pub const RADIO_RX_ENABLE_PIN: i32 = -1;

/// Delay from TX end to RX1 opening for a data uplink.
pub const UPLINK_RX1_DELAY: Duration = Duration::from_secs(1);
/// Delay from TX end to RX2 opening for a data uplink.
pub const UPLINK_RX2_DELAY: Duration = Duration::from_secs(2);
/// Delay from TX end to RX1 opening for a JoinRequest.
pub const JOIN_RX1_DELAY: Duration = Duration::from_secs(5);
/// Delay from TX end to RX2 opening for a JoinRequest.
pub const JOIN_RX2_DELAY: Duration = Duration::from_secs(6);

/// LoRa coding rate, expressed as the denominator of 4/x (4/5 here).
pub const LORA_CODING_RATE: u8 = 5;
/// Public-network LoRaWAN sync word.
pub const LORA_SYNC_WORD: u8 = 0x34;
/// Preamble length in symbols.
pub const LORA_PREAMBLE_SIZE: u16 = 8;
/// Maximum PHYPayload size in bytes.
pub const LORA_PAYLOAD_MAX_SIZE: usize = 255;
/// Default TX power in dBm.
pub const LORA_DEFAULT_TX_POWER: i8 = 17;

/// IQ polarity for uplink frames (normal).
pub const UPLINK_IQ_POLARITY: bool = false;
/// IQ polarity for downlink frames (inverted).
pub const DOWNLINK_IQ_POLARITY: bool = true;
/// CRC enabled on uplink.
pub const UPLINK_CRC_ENABLED: bool = true;
/// CRC disabled on downlink (the network server's CRC is not re-checked by
/// the end device; integrity is enforced by the MIC instead).
pub const DOWNLINK_CRC_ENABLED: bool = false;

/// Maximum bytes of piggybacked MAC commands in FOpts.
pub const LORAWAN_MAX_FOPTS_LEN: usize = 15;
/// Maximum application payload length accepted by this engine.
pub const LORAWAN_MAX_PAYLOAD_LEN: usize = 224;

/// RX-window scheduler tick period.
pub const SCHEDULER_TICK: Duration = Duration::from_millis(200);

/// Per-tick radio poll timeout; well under the scheduler tick so the
/// background task never holds the radio mutex across a long blocking wait.
pub const RADIO_POLL_TIMEOUT_MS: u64 = 50;

/// How long `transmit`/`join` wait for the radio to report TX-done before
/// treating the attempt as a hardware TX failure.
pub const RADIO_TX_WAIT_MS: u64 = 4_000;

/// Default join retry budget used by the CLI front end and tests.
pub const DEFAULT_JOIN_MAX_TRIES: u8 = 3;

/// Minimum interval between repeated identical throttled log lines.
pub const LOG_THROTTLE_INTERVAL: Duration = Duration::from_secs(5);
