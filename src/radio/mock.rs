//! In-memory [`RadioDriver`] test double.
//!
//! No SPI, no GPIO, no timing: a queue of inbound frames and a log of
//! outbound ones, driven entirely by the test harness. Used by this crate's
//! own unit tests and by the integration scenarios under `tests/`.

use std::collections::VecDeque;

use super::{LinkParams, RadioDriver, RadioStatus};
use crate::error::RadioError;

/// One scripted inbound event the mock will hand back from [`poll`](RadioDriver::poll).
#[derive(Debug, Clone)]
pub enum ScriptedEvent {
    /// A downlink frame arrives with the given RSSI/SNR.
    Rx { frame: Vec<u8>, rssi: f32, snr: f32 },
    /// No frame arrives before the window times out.
    Timeout,
}

/// Deterministic stand-in for [`super::sx126x::Sx126xDriver`].
#[derive(Debug, Default)]
pub struct MockRadioDriver {
    begun: bool,
    mode: Option<&'static str>,
    inbound: VecDeque<ScriptedEvent>,
    pub sent_frames: Vec<Vec<u8>>,
    last_rssi: f32,
    last_snr: f32,
    last_rx_frame: Vec<u8>,
    fail_next_transmit: bool,
}

impl MockRadioDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a downlink the next matching `poll` call will surface.
    pub fn push_rx(&mut self, frame: Vec<u8>, rssi: f32, snr: f32) {
        self.inbound.push_back(ScriptedEvent::Rx { frame, rssi, snr });
    }

    /// Queues an RX timeout for the next `poll` call.
    pub fn push_timeout(&mut self) {
        self.inbound.push_back(ScriptedEvent::Timeout);
    }

    /// Makes the next `transmit` call report a hardware TX failure.
    pub fn fail_next_transmit(&mut self) {
        self.fail_next_transmit = true;
    }

    /// Frames handed to `transmit` so far, most recent last.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent_frames
    }
}

impl RadioDriver for MockRadioDriver {
    fn begin(&mut self) -> Result<(), RadioError> {
        self.begun = true;
        Ok(())
    }

    fn set_tx_mode(&mut self, _params: LinkParams, _tx_power: i8) -> Result<(), RadioError> {
        if !self.begun {
            return Err(RadioError::NotInitialized);
        }
        self.mode = Some("tx");
        Ok(())
    }

    fn set_rx1_mode(&mut self, _params: LinkParams) -> Result<(), RadioError> {
        if !self.begun {
            return Err(RadioError::NotInitialized);
        }
        self.mode = Some("rx1");
        Ok(())
    }

    fn set_rx2_mode(&mut self, _params: LinkParams) -> Result<(), RadioError> {
        if !self.begun {
            return Err(RadioError::NotInitialized);
        }
        self.mode = Some("rx2");
        Ok(())
    }

    fn transmit(&mut self, data: &[u8], _wait_ms: u64) -> Result<bool, RadioError> {
        if !self.begun {
            return Err(RadioError::NotInitialized);
        }
        if self.fail_next_transmit {
            self.fail_next_transmit = false;
            return Ok(false);
        }
        self.sent_frames.push(data.to_vec());
        Ok(true)
    }

    fn poll(&mut self, _timeout_ms: u64) -> Result<RadioStatus, RadioError> {
        if !self.begun {
            return Err(RadioError::NotInitialized);
        }
        match self.inbound.pop_front() {
            Some(ScriptedEvent::Rx { frame, rssi, snr }) => {
                self.last_rssi = rssi;
                self.last_snr = snr;
                self.last_rx_frame = frame;
                Ok(RadioStatus::RxDone)
            }
            Some(ScriptedEvent::Timeout) => Ok(RadioStatus::RxTimeout),
            None => Ok(RadioStatus::Default),
        }
    }

    fn read_available(&mut self) -> Result<Vec<u8>, RadioError> {
        Ok(std::mem::take(&mut self.last_rx_frame))
    }

    fn snr(&self) -> f32 {
        self.last_snr
    }

    fn rssi(&self) -> f32 {
        self.last_rssi
    }
}

/// Clonable handle onto a [`MockRadioDriver`], for integration tests that
/// need to script RX events on a radio already owned by a running
/// [`crate::engine::MacEngine`]. The engine holds one clone as its
/// `RadioDriver`; the test harness holds the other and drives it directly,
/// independent of the engine's own state mutex.
#[derive(Clone, Default)]
pub struct SharedMockRadio(std::sync::Arc<std::sync::Mutex<MockRadioDriver>>);

impl SharedMockRadio {
    pub fn new() -> Self {
        Self(std::sync::Arc::new(std::sync::Mutex::new(MockRadioDriver::new())))
    }

    pub fn push_rx(&self, frame: Vec<u8>, rssi: f32, snr: f32) {
        self.0.lock().unwrap().push_rx(frame, rssi, snr);
    }

    pub fn push_timeout(&self) {
        self.0.lock().unwrap().push_timeout();
    }

    pub fn fail_next_transmit(&self) {
        self.0.lock().unwrap().fail_next_transmit();
    }

    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().sent_frames().to_vec()
    }
}

impl RadioDriver for SharedMockRadio {
    fn begin(&mut self) -> Result<(), RadioError> {
        self.0.lock().unwrap().begin()
    }

    fn set_tx_mode(&mut self, params: LinkParams, tx_power: i8) -> Result<(), RadioError> {
        self.0.lock().unwrap().set_tx_mode(params, tx_power)
    }

    fn set_rx1_mode(&mut self, params: LinkParams) -> Result<(), RadioError> {
        self.0.lock().unwrap().set_rx1_mode(params)
    }

    fn set_rx2_mode(&mut self, params: LinkParams) -> Result<(), RadioError> {
        self.0.lock().unwrap().set_rx2_mode(params)
    }

    fn transmit(&mut self, data: &[u8], wait_ms: u64) -> Result<bool, RadioError> {
        self.0.lock().unwrap().transmit(data, wait_ms)
    }

    fn poll(&mut self, timeout_ms: u64) -> Result<RadioStatus, RadioError> {
        self.0.lock().unwrap().poll(timeout_ms)
    }

    fn read_available(&mut self) -> Result<Vec<u8>, RadioError> {
        self.0.lock().unwrap().read_available()
    }

    fn snr(&self) -> f32 {
        self.0.lock().unwrap().snr()
    }

    fn rssi(&self) -> f32 {
        self.0.lock().unwrap().rssi()
    }
}
