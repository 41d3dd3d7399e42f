//! Raspberry Pi SPI0 + GPIO backed [`Hal`] implementation.
//!
//! Pinout matches the reference deployment: SPI0 (`/dev/spidev0.0`) for the
//! SX126x command interface, BCM reset/busy GPIOs, and optional BCM
//! IRQ/TX-enable/RX-enable pins (`-1` disables each).

use rppal::gpio::{Gpio, InputPin, Level, OutputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use super::hal::{Hal, HalError};

/// GPIO pin assignments for the SX126x on a Raspberry Pi.
#[derive(Debug, Clone, Copy)]
pub struct GpioPins {
    pub reset: i32,
    pub busy: i32,
    pub irq: i32,
    pub tx_enable: i32,
    pub rx_enable: i32,
}

impl Default for GpioPins {
    fn default() -> Self {
        Self {
            reset: crate::constants::RADIO_RESET_PIN,
            busy: crate::constants::RADIO_BUSY_PIN,
            irq: crate::constants::RADIO_IRQ_PIN,
            tx_enable: crate::constants::RADIO_TX_ENABLE_PIN,
            rx_enable: crate::constants::RADIO_RX_ENABLE_PIN,
        }
    }
}

/// SPI0 + GPIO transport for the SX126x command layer.
pub struct RaspberryPiHal {
    spi: Spi,
    reset_pin: Option<OutputPin>,
    busy_pin: Option<InputPin>,
    irq_pin: Option<InputPin>,
    tx_enable_pin: Option<OutputPin>,
    rx_enable_pin: Option<OutputPin>,
}

impl RaspberryPiHal {
    /// Opens SPI bus `bus_id` (0 or 1), chip-select `cs_id`, at the SX126x's
    /// maximum command-interface clock (a conservative 2 MHz, mode 0), and
    /// claims the configured GPIO pins.
    pub fn new(bus_id: u8, cs_id: u8, pins: GpioPins) -> Result<Self, HalError> {
        let bus = if bus_id == 0 { Bus::Spi0 } else { Bus::Spi1 };
        let slave_select = if cs_id == 0 {
            SlaveSelect::Ss0
        } else {
            SlaveSelect::Ss1
        };
        let spi = Spi::new(bus, slave_select, 2_000_000, Mode::Mode0)
            .map_err(|e| HalError::Spi(e.to_string()))?;

        let gpio = Gpio::new().map_err(|e| HalError::Gpio(e.to_string()))?;

        let reset_pin = if pins.reset >= 0 {
            Some(
                gpio.get(pins.reset as u8)
                    .map_err(|e| HalError::Gpio(e.to_string()))?
                    .into_output(),
            )
        } else {
            None
        };
        let busy_pin = if pins.busy >= 0 {
            Some(
                gpio.get(pins.busy as u8)
                    .map_err(|e| HalError::Gpio(e.to_string()))?
                    .into_input(),
            )
        } else {
            None
        };
        let irq_pin = if pins.irq >= 0 {
            Some(
                gpio.get(pins.irq as u8)
                    .map_err(|e| HalError::Gpio(e.to_string()))?
                    .into_input(),
            )
        } else {
            None
        };
        let tx_enable_pin = if pins.tx_enable >= 0 {
            Some(
                gpio.get(pins.tx_enable as u8)
                    .map_err(|e| HalError::Gpio(e.to_string()))?
                    .into_output(),
            )
        } else {
            None
        };
        let rx_enable_pin = if pins.rx_enable >= 0 {
            Some(
                gpio.get(pins.rx_enable as u8)
                    .map_err(|e| HalError::Gpio(e.to_string()))?
                    .into_output(),
            )
        } else {
            None
        };

        Ok(Self {
            spi,
            reset_pin,
            busy_pin,
            irq_pin,
            tx_enable_pin,
            rx_enable_pin,
        })
    }
}

impl Hal for RaspberryPiHal {
    fn write_command(&mut self, opcode: u8, data: &[u8]) -> Result<(), HalError> {
        let mut frame = Vec::with_capacity(1 + data.len());
        frame.push(opcode);
        frame.extend_from_slice(data);
        self.spi
            .write(&frame)
            .map(|_| ())
            .map_err(|e| HalError::Spi(e.to_string()))
    }

    fn read_command(&mut self, opcode: u8, buf: &mut [u8]) -> Result<(), HalError> {
        let mut tx = vec![opcode];
        tx.resize(1 + buf.len(), 0x00);
        let mut rx = vec![0u8; tx.len()];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HalError::Spi(e.to_string()))?;
        buf.copy_from_slice(&rx[1..]);
        Ok(())
    }

    fn gpio_read(&mut self, pin: i32) -> Result<bool, HalError> {
        if pin == crate::constants::RADIO_BUSY_PIN {
            if let Some(busy) = &self.busy_pin {
                return Ok(busy.read() == Level::High);
            }
        }
        if pin == crate::constants::RADIO_IRQ_PIN {
            if let Some(irq) = &self.irq_pin {
                return Ok(irq.read() == Level::High);
            }
        }
        Ok(false)
    }

    fn gpio_write(&mut self, pin: i32, value: bool) -> Result<(), HalError> {
        if pin == crate::constants::RADIO_RESET_PIN {
            if let Some(reset) = &mut self.reset_pin {
                reset.write(if value { Level::High } else { Level::Low });
            }
            return Ok(());
        }
        if pin == crate::constants::RADIO_TX_ENABLE_PIN {
            if let Some(tx_en) = &mut self.tx_enable_pin {
                tx_en.write(if value { Level::High } else { Level::Low });
            }
            return Ok(());
        }
        if pin == crate::constants::RADIO_RX_ENABLE_PIN {
            if let Some(rx_en) = &mut self.rx_enable_pin {
                rx_en.write(if value { Level::High } else { Level::Low });
            }
            return Ok(());
        }
        Ok(())
    }
}
