//! Hardware-abstraction seam between the SX126x command layer and the
//! physical SPI/GPIO transport. Kept as a plain trait (not `async_trait`):
//! every call is a short, bounded SPI transaction, so the blocking driver
//! stays simple and the RX-window scheduler merely holds the radio mutex
//! across it rather than awaiting it.

use thiserror::Error;

/// Errors surfaced by a `Hal` implementation.
#[derive(Debug, Error)]
pub enum HalError {
    #[error("SPI communication error: {0}")]
    Spi(String),

    #[error("GPIO operation error: {0}")]
    Gpio(String),

    #[error("timeout waiting for BUSY to clear")]
    Timeout,
}

/// Hardware Abstraction Layer trait for SX126x radio control.
pub trait Hal: Send {
    /// Writes an opcode with optional data to the radio over SPI.
    fn write_command(&mut self, opcode: u8, data: &[u8]) -> Result<(), HalError>;

    /// Reads a command response from the radio over SPI.
    fn read_command(&mut self, opcode: u8, buf: &mut [u8]) -> Result<(), HalError>;

    /// Reads the state of a GPIO input pin (e.g. BUSY).
    fn gpio_read(&mut self, pin: i32) -> Result<bool, HalError>;

    /// Writes a GPIO output pin (e.g. RESET), if the pin is enabled
    /// (`-1` disables it and this is a no-op).
    fn gpio_write(&mut self, pin: i32, value: bool) -> Result<(), HalError>;
}
