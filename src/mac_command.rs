//! # MAC-Command Processor (C6)
//!
//! Parses the FOpts byte stream (or an FPort=0 payload) from a decoded
//! downlink and accumulates device answers to piggyback on the next
//! uplink. Command IDs beyond LinkADR/DevStatus are recognized just well
//! enough to skip their fixed-length bodies; no answer is emitted for them
//! (§4.5, documented limitation).

use crate::error::MacCommandError;

/// LoRaWAN MAC command identifiers this engine recognizes on the downlink
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Cid {
    LinkCheck = 0x02,
    LinkAdr = 0x03,
    DutyCycle = 0x04,
    RxParamSetup = 0x05,
    DevStatus = 0x06,
    NewChannel = 0x07,
    RxTimingSetup = 0x08,
    TxParamSetup = 0x09,
    DlChannel = 0x0a,
    DeviceTime = 0x0b,
}

impl Cid {
    fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0x02 => Cid::LinkCheck,
            0x03 => Cid::LinkAdr,
            0x04 => Cid::DutyCycle,
            0x05 => Cid::RxParamSetup,
            0x06 => Cid::DevStatus,
            0x07 => Cid::NewChannel,
            0x08 => Cid::RxTimingSetup,
            0x09 => Cid::TxParamSetup,
            0x0a => Cid::DlChannel,
            0x0b => Cid::DeviceTime,
            _ => return None,
        })
    }

    /// Length, in bytes, of the command body that follows the CID byte.
    /// Commands this engine doesn't act on are still skipped correctly by
    /// this table so a later recognized command in the same FOpts stream
    /// still parses.
    fn body_len(self) -> usize {
        match self {
            Cid::LinkCheck => 0,
            Cid::LinkAdr => 4,
            Cid::DutyCycle => 1,
            Cid::RxParamSetup => 4,
            Cid::DevStatus => 0,
            Cid::NewChannel => 5,
            Cid::RxTimingSetup => 1,
            Cid::TxParamSetup => 1,
            Cid::DlChannel => 4,
            Cid::DeviceTime => 0,
        }
    }
}

/// Accumulates pending MAC-command answers between transmissions.
///
/// Owned by C7; `take_answer` both returns and clears the buffer so a
/// stale answer is never retransmitted.
#[derive(Debug, Default)]
pub struct MacCommandProcessor {
    answer: Vec<u8>,
    last_snr: i8,
    battery_level: u8,
}

impl MacCommandProcessor {
    pub fn new() -> Self {
        Self {
            answer: Vec::new(),
            last_snr: 0,
            // 255 = "unable to measure" per LoRaWAN 1.0.2 §5: this engine
            // has no battery telemetry source wired in by default.
            battery_level: 255,
        }
    }

    /// Records the most recent RX SNR (dB) so a later DevStatus answer can
    /// report it.
    pub fn record_snr(&mut self, snr: f32) {
        self.last_snr = snr.round().clamp(-32.0, 31.0) as i8;
    }

    /// Overrides the reported battery level (0 = external power, 1..254 =
    /// level, 255 = unknown).
    pub fn set_battery_level(&mut self, level: u8) {
        self.battery_level = level;
    }

    /// Parses a server FOpts stream (or an FPort=0 MAC-command payload),
    /// appending any generated answers to the internal accumulator.
    pub fn handle_downlink_commands(&mut self, commands: &[u8]) -> Result<(), MacCommandError> {
        let mut idx = 0;
        while idx < commands.len() {
            let cid_byte = commands[idx];
            let Some(cid) = Cid::from_u8(cid_byte) else {
                // Unknown CID: nothing in the spec defines its length, so
                // the only safe move is to stop parsing this buffer.
                idx += 1;
                continue;
            };
            idx += 1;
            let need = cid.body_len();
            if commands.len() < idx + need {
                return Err(MacCommandError::Truncated {
                    cid: cid_byte,
                    need: idx + need - commands.len(),
                });
            }

            match cid {
                Cid::LinkAdr => self.answer_link_adr(),
                Cid::DevStatus => self.answer_dev_status(),
                // Parsed-and-skipped per §4.5: the body bytes are consumed
                // above but no answer is emitted.
                _ => {}
            }

            idx += need;
        }
        Ok(())
    }

    /// LinkADRAns: PowerACK, DataRateACK and ChannelMaskACK all set — full
    /// ADR evaluation is a non-goal, so this engine always accepts the
    /// server's request.
    fn answer_link_adr(&mut self) {
        const POWER_ACK: u8 = 0b100;
        const DATA_RATE_ACK: u8 = 0b010;
        const CHANNEL_MASK_ACK: u8 = 0b001;
        self.answer.push(Cid::LinkAdr as u8);
        self.answer
            .push(POWER_ACK | DATA_RATE_ACK | CHANNEL_MASK_ACK);
    }

    /// DevStatusAns: battery level, then a 6-bit signed SNR clamped to
    /// [-32, 31] and masked into its two's-complement 6-bit form.
    fn answer_dev_status(&mut self) {
        self.answer.push(Cid::DevStatus as u8);
        self.answer.push(self.battery_level);
        self.answer.push((self.last_snr as u8) & 0x3f);
    }

    /// Returns and clears the pending answer buffer.
    pub fn take_answer(&mut self) -> Option<Vec<u8>> {
        if self.answer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.answer))
        }
    }

    /// Reports whether an answer is queued, without clearing it. Used by
    /// the MAC engine to decide whether a downlink needs a stack-transmit
    /// (§4.6 "stack transmit") before `take_answer` consumes it.
    pub fn has_pending_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}
