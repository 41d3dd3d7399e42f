//! # MAC Engine (C7)
//!
//! The hard core: owns the [`DeviceRecord`], sequences the frame codec, the
//! radio driver and the persistence store, runs the RX-window scheduler,
//! and dispatches the `on_join`/`on_transmit`/`on_receive` callbacks.
//!
//! A single `tokio::sync::Mutex` — [`EngineState`] — guards everything the
//! background scheduler and the foreground `join`/`transmit` calls share:
//! the device record, the radio handle, the MAC-command accumulator and
//! the RX-window deadlines (§5: "the radio mutex is the only lock"). The
//! Device Record is mutated exclusively while this mutex is held, which is
//! the discipline §4.6/§5 require an implementation to pick and document.
//!
//! Application callbacks are always invoked *after* the mutex guard has
//! been dropped (§9 "cyclic reference between engine and callbacks"), so a
//! callback that calls back into `is_joined`/`transmit` never deadlocks on
//! a held lock.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use log::{debug, error, info, warn};
use rand::Rng;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use crate::callbacks::{Callbacks, JoinStatus, ReceiveStatus, TransmitStatus};
use crate::codec::{self, DownlinkFCtrlFlags, MType};
use crate::constants::*;
use crate::device::DeviceRecord;
use crate::error::EngineError;
use crate::mac_command::MacCommandProcessor;
use crate::persistence::JsonFileStore;
use crate::radio::{LinkParams, RadioDriver, RadioStatus};
use crate::region::{Region, SpreadingFactor};

/// State shared between the foreground API and the background scheduler,
/// held behind the engine's single mutex.
struct EngineState<R: RadioDriver> {
    device: DeviceRecord,
    radio: R,
    mac_cmds: MacCommandProcessor,
    /// Moment RX2 should be armed, set by `join`/`transmit` at TX end.
    rx2_window_time: Option<Instant>,
    /// Moment the armed RX2 window closes with no matching downlink.
    rx2_window_timeout: Option<Instant>,
    /// Join attempts left to try on the next RX2 timeout; 0 once the final
    /// attempt has been sent.
    join_tries_remaining: u8,
    /// Whether the armed RX window belongs to an outstanding join attempt,
    /// as opposed to a data uplink. Needed because `join_tries_remaining`
    /// reaching 0 still means one more timeout must be reported as
    /// exhaustion, which `join_tries_remaining` alone can't distinguish
    /// from "no join in progress".
    join_in_progress: bool,
    /// Whether the in-flight uplink was confirmed and still awaits an ack.
    confirmed_in_flight: bool,
    /// FCnt16 of the last downlink whose MAC answers/callback were already
    /// delivered; used to dedup retransmitted downlinks (§4.6 "replay
    /// protection").
    last_processed_fcnt_down: Option<u16>,
    /// Channel/SF used for the most recent uplink, needed to compute the
    /// RX1 window's frequency (RX1 mirrors the uplink channel).
    last_tx_channel: u8,
    last_tx_sf: SpreadingFactor,
}

/// Outcomes computed while the mutex is held, fired after it is released.
enum Pending {
    Join(JoinStatus),
    Transmit(TransmitStatus),
    Receive(ReceiveStatus, Option<u8>, Vec<u8>),
    /// A JoinAccept failed to decode but a retry is allowed; fired outside
    /// the lock since `join` re-acquires it.
    RetryJoin(u8),
}

/// The LoRaWAN MAC state machine: session establishment, uplink/downlink
/// framing, dual receive-window scheduling and MAC-command bookkeeping.
///
/// Generic over the radio driver so the same engine logic runs against
/// [`crate::radio::mock::MockRadioDriver`] in tests and
/// [`crate::radio::sx126x::Sx126xDriver`] on real hardware.
pub struct MacEngine<R: RadioDriver + 'static> {
    state: Arc<Mutex<EngineState<R>>>,
    store: Arc<JsonFileStore>,
    callbacks: RwLock<Callbacks>,
    region: Region,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<R: RadioDriver + 'static> MacEngine<R> {
    /// Rehydrates the device record via the persistence store (inserting a
    /// fresh provisional record if none exists), initializes the radio and
    /// starts the background RX-window scheduler.
    pub async fn new(
        mut radio: R,
        store: Arc<JsonFileStore>,
        dev_eui: &[u8],
        app_eui: &[u8],
        app_key: &[u8],
        region: Region,
    ) -> Result<Arc<Self>, EngineError> {
        let device = match store.get(&hex::encode(dev_eui)) {
            Some(existing) => existing,
            None => {
                let provisioned = DeviceRecord::provision(dev_eui, app_eui, app_key, region)?;
                store.insert(provisioned)?
            }
        };

        radio.begin()?;

        let state = Arc::new(Mutex::new(EngineState {
            device,
            radio,
            mac_cmds: MacCommandProcessor::new(),
            rx2_window_time: None,
            rx2_window_timeout: None,
            join_tries_remaining: 0,
            join_in_progress: false,
            confirmed_in_flight: false,
            last_processed_fcnt_down: None,
            last_tx_channel: 0,
            last_tx_sf: region.max_spreading_factor(),
        }));

        let engine = Arc::new(Self {
            state,
            store,
            callbacks: RwLock::new(Callbacks::default()),
            region,
            shutdown_tx: Mutex::new(None),
            task: Mutex::new(None),
        });

        engine.clone().spawn_scheduler();
        Ok(engine)
    }

    fn spawn_scheduler(self: Arc<Self>) {
        let (tx, mut shutdown_rx) = oneshot::channel();
        *self.shutdown_tx.try_lock().expect("uncontended at construction") = Some(tx);

        let engine = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SCHEDULER_TICK);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("MAC engine scheduler stopping");
                        break;
                    }
                    _ = ticker.tick() => {
                        engine.tick().await;
                    }
                }
            }
        });

        *self.task.try_lock().expect("uncontended at construction") = Some(handle);
    }

    /// Stops the background scheduler and waits for it to exit.
    pub async fn shutdown(&self) {
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.task.lock().await.take() {
            let _ = handle.await;
        }
    }

    /// Registers the application's join/transmit/receive callbacks.
    pub async fn set_callbacks(&self, callbacks: Callbacks) {
        *self.callbacks.write().await = callbacks;
    }

    /// Sets the crate-wide log level filter.
    pub fn set_logging_level(&self, level: log::LevelFilter) {
        log::set_max_level(level);
    }

    pub async fn is_joined(&self) -> bool {
        self.state.lock().await.device.is_joined
    }

    async fn fire_join(&self, status: JoinStatus) {
        self.callbacks.read().await.fire_join(status);
    }

    async fn fire_transmit(&self, status: TransmitStatus) {
        self.callbacks.read().await.fire_transmit(status);
    }

    async fn fire_receive(&self, status: ReceiveStatus, f_port: Option<u8>, payload: Vec<u8>) {
        self.callbacks.read().await.fire_receive(status, f_port, payload);
    }

    async fn fire_all(self: &Arc<Self>, pending: Vec<Pending>) {
        for outcome in pending {
            match outcome {
                Pending::Join(status) => self.fire_join(status).await,
                Pending::Transmit(status) => self.fire_transmit(status).await,
                Pending::Receive(status, port, payload) => {
                    self.fire_receive(status, port, payload).await
                }
                Pending::RetryJoin(tries) => {
                    self.retry_join(tries).await;
                }
            }
        }
    }

    async fn retry_join(self: &Arc<Self>, tries: u8) {
        if self.clone().join(tries, false).await {
            debug!("join retry initiated, {tries} tries remaining");
        }
    }

    /// Joins the network via OTAA. If already joined and `forced` is
    /// `false`, reports `JoinOk` immediately without transmitting. Each
    /// call consumes one of `max_tries`; on RX2 timeout with no
    /// JoinAccept, the scheduler recurses with `max_tries - 1`.
    pub fn join<'a>(
        self: &'a Arc<Self>,
        max_tries: u8,
        forced: bool,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            if max_tries == 0 {
                self.fire_join(JoinStatus::JoinMaxTryError).await;
                return false;
            }

            let outcome = {
                let mut state = self.state.lock().await;
                if state.device.is_joined && !forced {
                    None
                } else {
                    Some(self.begin_join_locked(&mut state, max_tries).await)
                }
            };

            match outcome {
                None => {
                    self.fire_join(JoinStatus::JoinOk).await;
                    true
                }
                Some(TxOutcome::Ok) => true,
                Some(TxOutcome::TxFailed) => {
                    // Failure model: TX hardware failure switches straight to
                    // RX2 and, for a join in progress, decrements tries and
                    // recurses (§4.6 "Failure model").
                    self.join(max_tries - 1, forced).await
                }
                Some(TxOutcome::Err) => {
                    self.fire_join(JoinStatus::JoinRequestError).await;
                    false
                }
            }
        })
    }

    async fn begin_join_locked(&self, state: &mut EngineState<R>, max_tries: u8) -> TxOutcome {
        state.device.begin_join();

        let mut rng = rand::thread_rng();
        let dev_nonce: u16 = rng.gen();
        state.device.dev_nonce = dev_nonce;
        let dev_eui_hex = state.device.dev_eui_hex();

        // Invariant 3: DevNonce is durable before the JoinRequest is emitted.
        if let Err(e) = self.store.update_dev_nonce(&dev_eui_hex, dev_nonce) {
            error!("failed to persist DevNonce: {e}");
            return TxOutcome::Err;
        }

        let phy = codec::encode_join_request(
            &state.device.dev_eui,
            &state.device.app_eui,
            &state.device.app_key,
            dev_nonce,
        );

        let channel = self.pick_channel(&state.device, &mut rng, true);
        let sf = self.region.max_spreading_factor();
        let freq = match self.region.uplink_frequency(channel) {
            Ok(f) => f,
            Err(e) => {
                error!("region error picking join channel: {e}");
                return TxOutcome::Err;
            }
        };

        if state
            .radio
            .set_tx_mode(self.uplink_link_params(freq, sf), LORA_DEFAULT_TX_POWER)
            .is_err()
        {
            return TxOutcome::Err;
        }

        let tx_ok = state.radio.transmit(&phy, RADIO_TX_WAIT_MS).unwrap_or(false);
        if !tx_ok {
            let rx2_params = self.rx2_link_params();
            let _ = state.radio.set_rx2_mode(rx2_params);
            return TxOutcome::TxFailed;
        }

        state.last_tx_channel = channel;
        state.last_tx_sf = sf;
        let rx1_params = self.rx1_link_params(state);
        let _ = state.radio.set_rx1_mode(rx1_params);
        state.rx2_window_time = Some(Instant::now() + JOIN_RX1_DELAY);
        state.join_tries_remaining = max_tries - 1;
        state.join_in_progress = true;
        info!("JoinRequest transmitted, {} retries remaining on timeout", max_tries - 1);
        TxOutcome::Ok
    }

    /// Transmits an uplink, confirmed or unconfirmed. Requires the device
    /// to be joined. A second `transmit` call arriving before the prior
    /// RX2 window closes fails fast with `TxPayloadError` (§5, the
    /// implementer's documented choice — see DESIGN.md).
    pub async fn transmit(&self, payload: &[u8], confirmed: bool) -> bool {
        let mut state = self.state.lock().await;
        if !state.device.is_joined {
            drop(state);
            self.fire_transmit(TransmitStatus::TxJoinError).await;
            return false;
        }
        if state.rx2_window_time.is_some() || state.rx2_window_timeout.is_some() {
            drop(state);
            self.fire_transmit(TransmitStatus::TxPayloadError).await;
            return false;
        }

        let f_port = state.device.f_port;
        let status = self.send_uplink_locked(&mut state, payload, confirmed, f_port);
        drop(state);
        self.fire_transmit(status).await;
        matches!(status, TransmitStatus::TxOk)
    }

    /// Core uplink send path shared by `transmit` and the scheduler's
    /// MAC-command stack-transmit (§4.6 "stack transmit"). Caller already
    /// holds the state lock.
    fn send_uplink_locked(
        &self,
        state: &mut EngineState<R>,
        payload: &[u8],
        confirmed: bool,
        f_port: u8,
    ) -> TransmitStatus {
        let fopts = state.mac_cmds.take_answer().unwrap_or_default();
        let fcnt = state.device.fcnt + 1;
        let dev_eui_hex = state.device.dev_eui_hex();

        // Uplink FCnt persisted before the frame is emitted (§5 ordering
        // guarantee, invariant 2).
        if let Err(e) = self.store.update_fcnt(&dev_eui_hex, fcnt) {
            error!("failed to persist FCnt before transmit: {e}");
            return TransmitStatus::TxPayloadError;
        }
        state.device.fcnt = fcnt;
        state.device.confirmed_uplink = confirmed;

        let phy = match codec::encode_data_up(
            confirmed,
            payload,
            fcnt,
            f_port,
            state.device.dev_addr,
            &state.device.nwk_skey,
            &state.device.app_skey,
            state.device.adr,
            state.device.ack,
            &fopts,
        ) {
            Ok(p) => p,
            Err(e) => {
                error!("encode_data_up failed: {e}");
                return TransmitStatus::TxPayloadError;
            }
        };

        let mut rng = rand::thread_rng();
        let channel = self.pick_channel(&state.device, &mut rng, false);
        let sf = self.pick_tx_sf(&mut rng);
        let freq = self
            .region
            .uplink_frequency(channel)
            .unwrap_or_else(|_| self.region.uplink_frequency(0).expect("channel 0 valid"));

        if state
            .radio
            .set_tx_mode(self.uplink_link_params(freq, sf), LORA_DEFAULT_TX_POWER)
            .is_err()
        {
            return TransmitStatus::TxPayloadError;
        }

        let tx_ok = state.radio.transmit(&phy, RADIO_TX_WAIT_MS).unwrap_or(false);
        if !tx_ok {
            let rx2_params = self.rx2_link_params();
            let _ = state.radio.set_rx2_mode(rx2_params);
            return TransmitStatus::TxPayloadError;
        }

        state.last_tx_channel = channel;
        state.last_tx_sf = sf;
        let rx1_params = self.rx1_link_params(state);
        let _ = state.radio.set_rx1_mode(rx1_params);
        state.rx2_window_time = Some(Instant::now() + UPLINK_RX1_DELAY);
        state.confirmed_in_flight = confirmed;
        TransmitStatus::TxOk
    }

    /// One RX-window scheduler tick (§4.6). Tries to acquire the state
    /// mutex without blocking; a contended tick simply yields to the next
    /// one, matching "bounded wait ... if contended, yield".
    async fn tick(self: &Arc<Self>) {
        let mut pending = Vec::new();
        {
            let mut state = match self.state.try_lock() {
                Ok(guard) => guard,
                Err(_) => return,
            };

            let now = Instant::now();

            if let Some(armed_at) = state.rx2_window_time {
                if now >= armed_at {
                    state.rx2_window_time = None;
                    let delay = if state.join_tries_remaining > 0 {
                        JOIN_RX2_DELAY
                    } else {
                        UPLINK_RX2_DELAY
                    };
                    state.rx2_window_timeout = Some(now + delay);
                    let params = self.rx2_link_params();
                    if let Err(e) = state.radio.set_rx2_mode(params) {
                        warn!("failed to switch to RX2 continuous mode: {e}");
                    }
                    return;
                }
            }

            if let Some(timeout_at) = state.rx2_window_timeout {
                if now >= timeout_at {
                    state.rx2_window_timeout = None;
                    if state.join_in_progress {
                        // Pushed even when `join_tries_remaining` is 0: that
                        // last attempt still needs one more `join(0, ..)`
                        // call to report `JoinMaxTryError` (§4.6).
                        let tries = state.join_tries_remaining;
                        state.join_in_progress = false;
                        pending.push(Pending::RetryJoin(tries));
                    } else if state.confirmed_in_flight && !state.device.ack_down {
                        state.confirmed_in_flight = false;
                        pending.push(Pending::Receive(ReceiveStatus::RxTimeoutError, None, Vec::new()));
                    }
                }
            }

            match state.radio.poll(RADIO_POLL_TIMEOUT_MS) {
                Ok(RadioStatus::TxDone) => debug!("radio reports TX done"),
                Ok(RadioStatus::RxDone) => {
                    let snr = state.radio.snr();
                    state.mac_cmds.record_snr(snr);
                    let frame = state.radio.read_available().unwrap_or_default();
                    self.handle_rx_frame(&mut state, &frame, &mut pending);
                }
                Ok(_) => {}
                Err(e) => warn!("radio poll error: {e}"),
            }
        }

        self.fire_all(pending).await;
    }

    /// Decodes and dispatches one received frame (§4.6 step 5). Caller
    /// already holds the state lock.
    fn handle_rx_frame(&self, state: &mut EngineState<R>, frame: &[u8], pending: &mut Vec<Pending>) {
        let mtype = match codec::message_type(frame) {
            Ok(m) => m,
            Err(e) => {
                warn!("malformed PHYPayload on RX: {e}");
                return;
            }
        };

        match mtype {
            MType::JoinAccept => self.handle_join_accept(state, frame, pending),
            MType::ConfirmedDataDown | MType::UnconfirmedDataDown => {
                self.handle_data_down(state, frame, mtype, pending)
            }
            other => debug!("ignoring unexpected message type {other:?} on RX"),
        }
    }

    fn handle_join_accept(&self, state: &mut EngineState<R>, frame: &[u8], pending: &mut Vec<Pending>) {
        if state.device.is_joined {
            debug!("ignoring stale JoinAccept, already joined");
            return;
        }

        match codec::decode_join_accept(frame, &state.device.app_key, state.device.dev_nonce) {
            Ok(accept) => {
                state
                    .device
                    .complete_join(accept.dev_addr, accept.nwk_skey.clone(), accept.app_skey.clone());
                let dev_eui_hex = state.device.dev_eui_hex();
                if let Err(e) = self.store.update_session_keys(
                    &dev_eui_hex,
                    accept.dev_addr,
                    accept.nwk_skey,
                    accept.app_skey,
                ) {
                    error!("failed to persist session keys: {e}");
                }

                // Channel-group rotation policy (§9 resolution, DESIGN.md):
                // rotate once per successful join cycle on US915.
                if matches!(self.region, Region::Us915) {
                    state.device.rotate_channel_group();
                    let _ = self.store.update_channel_group(
                        &dev_eui_hex,
                        state.device.channel_group,
                        state.device.uplink_channel_min,
                        state.device.uplink_channel_max,
                    );
                }

                state.join_tries_remaining = 0;
                state.join_in_progress = false;
                state.rx2_window_time = None;
                state.rx2_window_timeout = None;
                info!("JoinAccept verified, session established");
                pending.push(Pending::Join(JoinStatus::JoinOk));
            }
            Err(e) => {
                warn!("JoinAccept decode failed: {e}");
                state.join_in_progress = false;
                if state.join_tries_remaining > 0 {
                    let tries = state.join_tries_remaining;
                    state.join_tries_remaining = 0;
                    state.rx2_window_timeout = None;
                    pending.push(Pending::RetryJoin(tries));
                } else {
                    pending.push(Pending::Join(JoinStatus::JoinAcceptError));
                }
            }
        }
    }

    fn handle_data_down(
        &self,
        state: &mut EngineState<R>,
        frame: &[u8],
        mtype: MType,
        pending: &mut Vec<Pending>,
    ) {
        if !state.device.is_joined {
            debug!("ignoring DataDown, device not joined");
            return;
        }

        let confirmed = matches!(mtype, MType::ConfirmedDataDown);
        let fcnt_upper16 = (state.device.fcnt_down >> 16) as u16;

        let decoded = match codec::decode_data_down(
            frame,
            state.device.dev_addr,
            &state.device.nwk_skey,
            &state.device.app_skey,
            fcnt_upper16,
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!("DataDown decode failed: {e}");
                pending.push(Pending::Receive(ReceiveStatus::RxPayloadError, None, Vec::new()));
                return;
            }
        };

        // A verified downlink closes the outstanding window regardless of
        // which phase it arrived in; nothing is still waited on after this.
        state.rx2_window_time = None;
        state.rx2_window_timeout = None;
        state.device.ack = confirmed;
        state.confirmed_in_flight = false;
        let is_replay = state.last_processed_fcnt_down == Some(decoded.fcnt16);
        state.device.ack_down = decoded.fctrl.contains(DownlinkFCtrlFlags::ACK);

        if !is_replay {
            state.last_processed_fcnt_down = Some(decoded.fcnt16);
            state.device.fcnt_down = decoded.fcnt32;
            let dev_eui_hex = state.device.dev_eui_hex();
            let _ = self.store.update_fcnt_down(&dev_eui_hex, state.device.fcnt_down);

            let mac_commands: &[u8] = if decoded.f_port == Some(0) {
                &decoded.mac_payload
            } else {
                &decoded.fopts
            };
            if let Err(e) = state.mac_cmds.handle_downlink_commands(mac_commands) {
                warn!("MAC command parse error: {e}");
            }
        }

        if !is_replay {
            if state.device.ack_down {
                pending.push(Pending::Transmit(TransmitStatus::TxNetworkAck));
            }

            if let Some(port) = decoded.f_port {
                if port != 0 && !decoded.mac_payload.is_empty() {
                    pending.push(Pending::Receive(ReceiveStatus::RxOk, Some(port), decoded.mac_payload));
                }
            }

            // Stack-transmit: an empty-payload, FPort=0 uplink that carries
            // the accumulated MAC-command answer (§4.6 "stack transmit").
            // `send_uplink_locked` pulls the answer itself via `take_answer`,
            // so this only needs to decide whether to fire it.
            if state.mac_cmds.has_pending_answer() {
                let status = self.send_uplink_locked(state, &[], false, 0);
                pending.push(Pending::Transmit(status));
            }
        }
    }

    fn pick_channel(&self, device: &DeviceRecord, rng: &mut impl Rng, for_join: bool) -> u8 {
        match self.region {
            Region::Eu868 => {
                let max = if for_join {
                    self.region.join_channel_max()
                } else {
                    self.region.uplink_channel_max()
                };
                rng.gen_range(0..=max)
            }
            Region::Us915 => rng.gen_range(device.uplink_channel_min..=device.uplink_channel_max),
        }
    }

    fn pick_tx_sf(&self, rng: &mut impl Rng) -> SpreadingFactor {
        let lo = self.region.min_spreading_factor().0;
        let hi = self.region.max_spreading_factor().0;
        SpreadingFactor(rng.gen_range(lo..=hi))
    }

    fn uplink_link_params(&self, frequency_hz: u32, spreading_factor: SpreadingFactor) -> LinkParams {
        LinkParams {
            frequency_hz,
            spreading_factor,
            bandwidth_hz: self.region.bandwidth_hz(),
            coding_rate: LORA_CODING_RATE,
            preamble_symbols: LORA_PREAMBLE_SIZE,
            sync_word: LORA_SYNC_WORD,
            crc_enabled: UPLINK_CRC_ENABLED,
            iq_inverted: UPLINK_IQ_POLARITY,
        }
    }

    fn rx1_link_params(&self, state: &EngineState<R>) -> LinkParams {
        let frequency_hz = self
            .region
            .downlink_frequency(state.last_tx_channel)
            .unwrap_or_else(|_| self.region.downlink_frequency(0).expect("channel 0 valid"));
        LinkParams {
            frequency_hz,
            spreading_factor: state.last_tx_sf,
            bandwidth_hz: self.region.bandwidth_hz(),
            coding_rate: LORA_CODING_RATE,
            preamble_symbols: LORA_PREAMBLE_SIZE,
            sync_word: LORA_SYNC_WORD,
            crc_enabled: DOWNLINK_CRC_ENABLED,
            iq_inverted: DOWNLINK_IQ_POLARITY,
        }
    }

    fn rx2_link_params(&self) -> LinkParams {
        LinkParams {
            frequency_hz: self.region.rx2_frequency(),
            spreading_factor: self.region.rx2_spreading_factor(),
            bandwidth_hz: self.region.bandwidth_hz(),
            coding_rate: LORA_CODING_RATE,
            preamble_symbols: LORA_PREAMBLE_SIZE,
            sync_word: LORA_SYNC_WORD,
            crc_enabled: DOWNLINK_CRC_ENABLED,
            iq_inverted: DOWNLINK_IQ_POLARITY,
        }
    }
}

/// Outcome of the locked TX attempt inside `join`.
enum TxOutcome {
    Ok,
    TxFailed,
    Err,
}
