//! # Engine Error Handling
//!
//! Defines one error enum per component plus a top-level `EngineError` that
//! aggregates them for the internal `Result`-returning functions the MAC
//! Engine calls. The public `join`/`transmit` surface stays callback-shaped
//! (see [`crate::callbacks`]); these types are for the internal plumbing
//! that feeds those callbacks.

use thiserror::Error;

use crate::device::DeviceError;

/// Errors raised by the region frequency/parameter profile (C1).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("channel {channel} out of range for region (max {max})")]
    ChannelOutOfRange { channel: u8, max: u8 },
}

/// Errors raised by the LoRaWAN frame codec (C4).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// PHYPayload shorter than the minimum MHDR+MIC length.
    #[error("malformed PHYPayload: {0}")]
    MalformedPhy(String),

    /// PHYPayload length inconsistent with the declared message type.
    #[error("PHYPayload length error: expected {expected}, got {actual}")]
    LengthError { expected: usize, actual: usize },

    /// MIC verification failed.
    #[error("MIC mismatch")]
    MicError,

    /// Decoded DevAddr does not match the device's assigned address.
    #[error("DevAddr mismatch: expected {expected:08x}, got {actual:08x}")]
    DevAddrMismatch { expected: u32, actual: u32 },

    /// FOpts or MAC-command payload exceeds the 15-byte limit.
    #[error("FOpts exceeds maximum length of 15 bytes: {0}")]
    FOptsTooLong(usize),
}

/// Errors raised by the SX126x radio driver (C5).
#[derive(Debug, Error)]
pub enum RadioError {
    #[error("radio bus error: {0}")]
    Bus(String),

    #[error("radio operation timed out")]
    Timeout,

    #[error("radio not initialized")]
    NotInitialized,
}

/// Errors raised by the persistence store (C3).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error accessing device store: {0}")]
    Io(#[from] std::io::Error),

    #[error("device record serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no device record for DevEUI {0}")]
    NotFound(String),
}

/// Errors raised by the MAC-command processor (C6).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MacCommandError {
    #[error("MAC command buffer truncated for CID 0x{cid:02x}: need {need} more bytes")]
    Truncated { cid: u8, need: usize },
}

/// Aggregate error type for C7's internal operations.
///
/// The engine never lets this escape across the `join`/`transmit` API
/// boundary; each variant is mapped to the relevant `JoinStatus` /
/// `TransmitStatus` / `ReceiveStatus` at the point it would otherwise be
/// returned to application code.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Radio(#[from] RadioError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    MacCommand(#[from] MacCommandError),

    #[error("device is not joined")]
    NotJoined,

    #[error("join retries exhausted")]
    JoinExhausted,
}
