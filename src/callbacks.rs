//! Outcome types and callback signatures for the MAC Engine's public API
//! (§6). `join` and `transmit` never return a `Result` across the crate
//! boundary; every success or failure mode is reported by invoking the
//! matching callback instead, always outside the radio mutex (§4.6).

/// Outcome of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStatus {
    /// JoinAccept received, MIC verified, session installed.
    JoinOk,
    /// The configured retry budget was exhausted with no JoinAccept.
    JoinMaxTryError,
    /// The JoinRequest itself could not be transmitted.
    JoinRequestError,
    /// A JoinAccept was received but failed MIC verification or decode.
    JoinAcceptError,
}

/// Outcome of a transmit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmitStatus {
    /// Uplink transmitted; no network ack was requested or one wasn't due.
    TxOk,
    /// Uplink transmitted and a requested confirmed-uplink ack was received.
    TxNetworkAck,
    /// The device is not joined; the uplink was not attempted.
    TxJoinError,
    /// The radio failed to transmit the frame.
    TxPayloadError,
}

/// Outcome of a received downlink, reported independently of the
/// originating transmit's [`TransmitStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveStatus {
    /// A downlink was received, verified and delivered to the application.
    RxOk,
    /// A downlink arrived but failed MIC verification, DevAddr match, or
    /// decode.
    RxPayloadError,
    /// No downlink arrived in either receive window.
    RxTimeoutError,
}

/// Invoked once per join attempt with the final [`JoinStatus`].
pub type JoinCallback = Box<dyn Fn(JoinStatus) + Send + Sync>;

/// Invoked once per `transmit` call with the final [`TransmitStatus`].
pub type TransmitCallback = Box<dyn Fn(TransmitStatus) + Send + Sync>;

/// Invoked whenever a downlink is (or fails to be) received, with the
/// decoded application payload and port when [`ReceiveStatus::RxOk`].
pub type ReceiveCallback = Box<dyn Fn(ReceiveStatus, Option<u8>, Vec<u8>) + Send + Sync>;

/// Callback set the MAC Engine invokes; any slot left `None` is silently
/// skipped (§6: callbacks are optional).
#[derive(Default)]
pub struct Callbacks {
    pub on_join: Option<JoinCallback>,
    pub on_transmit: Option<TransmitCallback>,
    pub on_receive: Option<ReceiveCallback>,
}

impl Callbacks {
    pub fn fire_join(&self, status: JoinStatus) {
        if let Some(cb) = &self.on_join {
            cb(status);
        }
    }

    pub fn fire_transmit(&self, status: TransmitStatus) {
        if let Some(cb) = &self.on_transmit {
            cb(status);
        }
    }

    pub fn fire_receive(&self, status: ReceiveStatus, f_port: Option<u8>, payload: Vec<u8>) {
        if let Some(cb) = &self.on_receive {
            cb(status, f_port, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn unset_callback_is_a_no_op() {
        let callbacks = Callbacks::default();
        callbacks.fire_join(JoinStatus::JoinOk);
    }

    #[test]
    fn set_callback_fires() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();
        let mut callbacks = Callbacks::default();
        callbacks.on_transmit = Some(Box::new(move |_status| {
            fired_clone.store(true, Ordering::SeqCst);
        }));
        callbacks.fire_transmit(TransmitStatus::TxOk);
        assert!(fired.load(Ordering::SeqCst));
    }
}
