//! SX126x command-layer driver, generic over a [`Hal`] transport.
//!
//! Implements the subset of the SX126x command set this engine needs:
//! standby/sleep, LoRa packet/modulation params, TX/RX mode entry, IRQ
//! status and packet status readback. Register/command opcodes follow the
//! Semtech SX1261/2/8 datasheet.

use std::time::{Duration, Instant};

use super::hal::Hal;
use super::{LinkParams, RadioDriver, RadioStatus};
use crate::error::RadioError;

mod commands {
    pub const SET_STANDBY: u8 = 0x80;
    pub const SET_PACKET_TYPE: u8 = 0x8a;
    pub const SET_RF_FREQUENCY: u8 = 0x86;
    pub const SET_TX_PARAMS: u8 = 0x8e;
    pub const SET_MODULATION_PARAMS: u8 = 0x8b;
    pub const SET_PACKET_PARAMS: u8 = 0x8c;
    pub const SET_TX: u8 = 0x83;
    pub const SET_RX: u8 = 0x82;
    pub const SET_DIO_IRQ_PARAMS: u8 = 0x8d;
    pub const GET_IRQ_STATUS: u8 = 0x12;
    pub const CLEAR_IRQ_STATUS: u8 = 0x02;
    pub const GET_PACKET_STATUS: u8 = 0x14;
    pub const READ_BUFFER: u8 = 0x1e;
    pub const WRITE_BUFFER: u8 = 0x0e;
    pub const GET_RX_BUFFER_STATUS: u8 = 0x13;
}

mod irq {
    pub const TX_DONE: u16 = 1 << 0;
    pub const RX_DONE: u16 = 1 << 1;
    pub const CRC_ERR: u16 = 1 << 6;
    pub const HEADER_ERR: u16 = 1 << 5;
    pub const TIMEOUT: u16 = 1 << 9;
}

const PACKET_TYPE_LORA: u8 = 0x01;
const RX_CONTINUOUS: u32 = 0xff_ff_ff;

/// SX126x driver bound to a concrete [`Hal`] transport.
pub struct Sx126xDriver<H: Hal> {
    hal: H,
    initialized: bool,
    last_rssi: f32,
    last_snr: f32,
}

impl<H: Hal> Sx126xDriver<H> {
    pub fn new(hal: H) -> Self {
        Self {
            hal,
            initialized: false,
            last_rssi: 0.0,
            last_snr: 0.0,
        }
    }

    fn set_standby(&mut self) -> Result<(), RadioError> {
        self.hal
            .write_command(commands::SET_STANDBY, &[0x00])
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn set_rf_frequency(&mut self, freq_hz: u32) -> Result<(), RadioError> {
        // SX126x frequency register is freq_hz * 2^25 / F_XTAL (32 MHz).
        let raw = ((freq_hz as u64) << 25) / 32_000_000;
        let bytes = (raw as u32).to_be_bytes();
        self.hal
            .write_command(commands::SET_RF_FREQUENCY, &bytes)
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn configure_lora(&mut self, params: LinkParams) -> Result<(), RadioError> {
        self.hal
            .write_command(commands::SET_PACKET_TYPE, &[PACKET_TYPE_LORA])
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        self.set_rf_frequency(params.frequency_hz)?;

        let bw_param = bandwidth_to_param(params.bandwidth_hz);
        self.hal
            .write_command(
                commands::SET_MODULATION_PARAMS,
                &[
                    params.spreading_factor.0,
                    bw_param,
                    params.coding_rate,
                    0x00,
                ],
            )
            .map_err(|e| RadioError::Bus(e.to_string()))?;

        let preamble = params.preamble_symbols.to_be_bytes();
        let crc_flag = if params.crc_enabled { 0x01 } else { 0x00 };
        let iq_flag = if params.iq_inverted { 0x01 } else { 0x00 };
        self.hal
            .write_command(
                commands::SET_PACKET_PARAMS,
                &[
                    preamble[0], preamble[1], // preamble length
                    0x00, // explicit header
                    0xff, // max payload length
                    crc_flag, iq_flag,
                ],
            )
            .map_err(|e| RadioError::Bus(e.to_string()))?;

        self.hal
            .write_command(
                commands::SET_DIO_IRQ_PARAMS,
                &[0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00],
            )
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn wait_busy_clear(&mut self, timeout: Duration) -> Result<(), RadioError> {
        let start = Instant::now();
        while self
            .hal
            .gpio_read(crate::constants::RADIO_BUSY_PIN)
            .map_err(|e| RadioError::Bus(e.to_string()))?
        {
            if start.elapsed() > timeout {
                return Err(RadioError::Timeout);
            }
        }
        Ok(())
    }

    fn get_irq_status(&mut self) -> Result<u16, RadioError> {
        let mut buf = [0u8; 3];
        self.hal
            .read_command(commands::GET_IRQ_STATUS, &mut buf)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        Ok(u16::from_be_bytes([buf[1], buf[2]]))
    }

    fn clear_irq_status(&mut self, mask: u16) -> Result<(), RadioError> {
        let bytes = mask.to_be_bytes();
        self.hal
            .write_command(commands::CLEAR_IRQ_STATUS, &bytes)
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn update_packet_status(&mut self) -> Result<(), RadioError> {
        let mut buf = [0u8; 3];
        self.hal
            .read_command(commands::GET_PACKET_STATUS, &mut buf)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        self.last_rssi = -(buf[1] as f32) / 2.0;
        self.last_snr = (buf[2] as i8) as f32 / 4.0;
        Ok(())
    }
}

impl<H: Hal> RadioDriver for Sx126xDriver<H> {
    fn begin(&mut self) -> Result<(), RadioError> {
        self.hal
            .gpio_write(crate::constants::RADIO_RESET_PIN, false)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        self.hal
            .gpio_write(crate::constants::RADIO_RESET_PIN, true)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        self.wait_busy_clear(Duration::from_millis(100))?;
        self.set_standby()?;
        self.initialized = true;
        Ok(())
    }

    fn set_tx_mode(&mut self, params: LinkParams, tx_power: i8) -> Result<(), RadioError> {
        if !self.initialized {
            return Err(RadioError::NotInitialized);
        }
        self.configure_lora(params)?;
        self.hal
            .write_command(commands::SET_TX_PARAMS, &[tx_power as u8, 0x04])
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        Ok(())
    }

    fn set_rx1_mode(&mut self, params: LinkParams) -> Result<(), RadioError> {
        if !self.initialized {
            return Err(RadioError::NotInitialized);
        }
        self.configure_lora(params)?;
        let timeout = [0x00, 0x00, 0x00];
        self.hal
            .write_command(commands::SET_RX, &timeout)
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn set_rx2_mode(&mut self, params: LinkParams) -> Result<(), RadioError> {
        if !self.initialized {
            return Err(RadioError::NotInitialized);
        }
        self.configure_lora(params)?;
        let timeout = RX_CONTINUOUS.to_be_bytes();
        self.hal
            .write_command(commands::SET_RX, &timeout[1..])
            .map_err(|e| RadioError::Bus(e.to_string()))
    }

    fn transmit(&mut self, data: &[u8], wait_ms: u64) -> Result<bool, RadioError> {
        if !self.initialized {
            return Err(RadioError::NotInitialized);
        }
        let mut frame = vec![0x00]; // buffer offset
        frame.extend_from_slice(data);
        self.hal
            .write_command(commands::WRITE_BUFFER, &frame)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        self.hal
            .write_command(commands::SET_TX, &[0x00, 0x00, 0x00])
            .map_err(|e| RadioError::Bus(e.to_string()))?;

        let start = Instant::now();
        loop {
            let status = self.get_irq_status()?;
            if status & irq::TX_DONE != 0 {
                self.clear_irq_status(irq::TX_DONE)?;
                return Ok(true);
            }
            if start.elapsed() > Duration::from_millis(wait_ms) {
                return Ok(false);
            }
        }
    }

    fn poll(&mut self, timeout_ms: u64) -> Result<RadioStatus, RadioError> {
        if !self.initialized {
            return Err(RadioError::NotInitialized);
        }
        let _ = timeout_ms;
        let status = self.get_irq_status()?;
        if status == 0 {
            return Ok(RadioStatus::Default);
        }
        if status & irq::RX_DONE != 0 {
            self.clear_irq_status(irq::RX_DONE)?;
            self.update_packet_status()?;
            return Ok(RadioStatus::RxDone);
        }
        if status & irq::TX_DONE != 0 {
            self.clear_irq_status(irq::TX_DONE)?;
            return Ok(RadioStatus::TxDone);
        }
        if status & irq::TIMEOUT != 0 {
            self.clear_irq_status(irq::TIMEOUT)?;
            return Ok(RadioStatus::RxTimeout);
        }
        if status & irq::CRC_ERR != 0 {
            self.clear_irq_status(irq::CRC_ERR)?;
            return Ok(RadioStatus::CrcErr);
        }
        if status & irq::HEADER_ERR != 0 {
            self.clear_irq_status(irq::HEADER_ERR)?;
            return Ok(RadioStatus::HeaderErr);
        }
        self.clear_irq_status(status)?;
        Ok(RadioStatus::Default)
    }

    fn read_available(&mut self) -> Result<Vec<u8>, RadioError> {
        let mut status = [0u8; 2];
        self.hal
            .read_command(commands::GET_RX_BUFFER_STATUS, &mut status)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        let len = status[0] as usize;
        let mut buf = vec![0u8; len];
        self.hal
            .read_command(commands::READ_BUFFER, &mut buf)
            .map_err(|e| RadioError::Bus(e.to_string()))?;
        Ok(buf)
    }

    fn snr(&self) -> f32 {
        self.last_snr
    }

    fn rssi(&self) -> f32 {
        self.last_rssi
    }
}

impl<H: Hal> Drop for Sx126xDriver<H> {
    fn drop(&mut self) {
        let _ = self.set_standby();
    }
}

fn bandwidth_to_param(bandwidth_hz: u32) -> u8 {
    match bandwidth_hz {
        ..=7_812 => 0x00,
        ..=10_417 => 0x08,
        ..=15_625 => 0x01,
        ..=20_833 => 0x09,
        ..=31_250 => 0x02,
        ..=41_667 => 0x0a,
        ..=62_500 => 0x03,
        ..=125_000 => 0x04,
        ..=250_000 => 0x05,
        _ => 0x06,
    }
}
