//! # Radio Driver (C5)
//!
//! SX126x control surface the MAC Engine drives: TX mode, the two receive
//! windows, packet TX/RX and IRQ status polling. Expressed as a
//! [`RadioDriver`] trait so C7 can be exercised against [`mock::MockRadioDriver`]
//! without hardware; [`sx126x::Sx126xDriver`] is the real implementation,
//! generic over a [`hal::Hal`] transport so the GPIO/SPI backend
//! ([`raspberry_pi::RaspberryPiHal`] on real hardware) is swappable
//! independently of the LoRa command sequencing.

pub mod hal;
pub mod mock;
#[cfg(feature = "raspberry-pi")]
pub mod raspberry_pi;
pub mod sx126x;

use crate::error::RadioError;
use crate::region::SpreadingFactor;

/// IRQ/packet status reported by [`RadioDriver::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioStatus {
    Default,
    TxWait,
    TxDone,
    RxWait,
    RxContinuous,
    RxTimeout,
    RxDone,
    HeaderErr,
    CrcErr,
    CadWait,
    CadDetected,
    CadDone,
}

/// Radio link parameters for one TX or RX window.
#[derive(Debug, Clone, Copy)]
pub struct LinkParams {
    pub frequency_hz: u32,
    pub spreading_factor: SpreadingFactor,
    pub bandwidth_hz: u32,
    pub coding_rate: u8,
    pub preamble_symbols: u16,
    pub sync_word: u8,
    pub crc_enabled: bool,
    pub iq_inverted: bool,
}

/// SX126x control operations the MAC Engine needs. A single mutex (owned
/// by C7) serializes every call; no implementation is expected to be
/// internally thread-safe.
pub trait RadioDriver: Send {
    /// Resets and initializes the radio over the given pin configuration.
    fn begin(&mut self) -> Result<(), RadioError>;

    /// Configures the radio for transmission and emits `tx_power` dBm.
    fn set_tx_mode(&mut self, params: LinkParams, tx_power: i8) -> Result<(), RadioError>;

    /// Configures the radio for a single-shot RX1 window.
    fn set_rx1_mode(&mut self, params: LinkParams) -> Result<(), RadioError>;

    /// Configures the radio for RX2 continuous listening.
    fn set_rx2_mode(&mut self, params: LinkParams) -> Result<(), RadioError>;

    /// Transmits `data`, blocking up to `wait_ms` for TX-done. Returns
    /// `false` on a hardware TX failure (§4.6 "Failure model").
    fn transmit(&mut self, data: &[u8], wait_ms: u64) -> Result<bool, RadioError>;

    /// Polls IRQ status, blocking up to `timeout_ms`.
    fn poll(&mut self, timeout_ms: u64) -> Result<RadioStatus, RadioError>;

    /// Reads the bytes of the most recently received packet.
    fn read_available(&mut self) -> Result<Vec<u8>, RadioError>;

    /// SNR (dB) of the most recently received packet.
    fn snr(&self) -> f32;

    /// RSSI (dBm) of the most recently received packet.
    fn rssi(&self) -> f32;
}
