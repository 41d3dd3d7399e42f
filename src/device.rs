//! # Device Record (C2)
//!
//! Identity, session state and counters for a single end device. One
//! `DeviceRecord` is held by the MAC Engine and rehydrated from / flushed to
//! the persistence store (C3). Session key material zeroizes on drop.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::region::Region;

/// Errors constructing a `DeviceRecord` from raw provisioning data.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("DevEUI must be 8 bytes, got {0}")]
    InvalidDevEui(usize),
    #[error("AppEUI must be 8 bytes, got {0}")]
    InvalidAppEui(usize),
    #[error("AppKey must be 16 bytes, got {0}")]
    InvalidAppKey(usize),
}

/// 16 bytes of key material that zeroizes when dropped or replaced.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Key16(pub [u8; 16]);

impl Key16 {
    pub const fn zero() -> Self {
        Key16([0u8; 16])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 16]
    }
}

impl std::fmt::Debug for Key16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key16(***)")
    }
}

/// Persistent identity plus session state for one device.
///
/// Mirrors the reference firmware's device model field-for-field (see
/// `DESIGN.md`): the `uplink_*`/`downlink_*` buffers are transient, scoped
/// to a single request/response turn, and are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    // Identity — immutable after provisioning.
    pub dev_eui: [u8; 8],
    pub app_eui: [u8; 8],
    pub app_key: Key16,

    // Session — set on successful JoinAccept.
    pub dev_addr: [u8; 4],
    pub nwk_skey: Key16,
    pub app_skey: Key16,

    // Counters.
    pub dev_nonce: u16,
    pub fcnt: u32,
    pub fcnt_down: u32,

    // Flags.
    pub is_joined: bool,
    pub confirmed_uplink: bool,
    pub ack: bool,
    pub ack_down: bool,

    // Routing hint (US915 sub-band rotation).
    pub channel_group: u8,

    // Carried from the source device model.
    pub f_port: u8,
    pub f_port_down: u8,
    pub adr: bool,
    pub rfu: bool,
    pub join_max_tries: u8,
    pub uplink_channel_min: u8,
    pub uplink_channel_max: u8,

    pub region: Region,

    pub created_at: chrono::DateTime<chrono::Utc>,

    // Transient, never persisted.
    #[serde(skip)]
    pub uplink_mac_payload: Vec<u8>,
    #[serde(skip)]
    pub uplink_phy_payload: Vec<u8>,
    #[serde(skip)]
    pub downlink_phy_payload: Vec<u8>,
    #[serde(skip)]
    pub downlink_mac_payload: Vec<u8>,
}

impl DeviceRecord {
    /// Default application port used for uplinks until the application
    /// layer overrides it.
    pub const DEFAULT_FPORT: u8 = 2;

    /// Provisions a fresh, unjoined record. Validates identity field
    /// lengths (invariant 6, §3).
    pub fn provision(
        dev_eui: &[u8],
        app_eui: &[u8],
        app_key: &[u8],
        region: Region,
    ) -> Result<Self, DeviceError> {
        if dev_eui.len() != 8 {
            return Err(DeviceError::InvalidDevEui(dev_eui.len()));
        }
        if app_eui.len() != 8 {
            return Err(DeviceError::InvalidAppEui(app_eui.len()));
        }
        if app_key.len() != 16 {
            return Err(DeviceError::InvalidAppKey(app_key.len()));
        }

        let mut dev_eui_arr = [0u8; 8];
        dev_eui_arr.copy_from_slice(dev_eui);
        let mut app_eui_arr = [0u8; 8];
        app_eui_arr.copy_from_slice(app_eui);
        let mut app_key_arr = [0u8; 16];
        app_key_arr.copy_from_slice(app_key);

        Ok(Self {
            dev_eui: dev_eui_arr,
            app_eui: app_eui_arr,
            app_key: Key16(app_key_arr),
            dev_addr: [0u8; 4],
            nwk_skey: Key16::zero(),
            app_skey: Key16::zero(),
            dev_nonce: 0,
            fcnt: 0,
            fcnt_down: 0,
            is_joined: false,
            confirmed_uplink: false,
            ack: false,
            ack_down: false,
            channel_group: 0,
            f_port: Self::DEFAULT_FPORT,
            f_port_down: 0,
            adr: true,
            rfu: false,
            join_max_tries: 0,
            uplink_channel_min: 0,
            uplink_channel_max: region.uplink_channel_max(),
            region,
            created_at: chrono::Utc::now(),
            uplink_mac_payload: Vec::new(),
            uplink_phy_payload: Vec::new(),
            downlink_phy_payload: Vec::new(),
            downlink_mac_payload: Vec::new(),
        })
    }

    /// DevEUI as lowercase hex, the persistence store's primary key.
    pub fn dev_eui_hex(&self) -> String {
        hex::encode(self.dev_eui)
    }

    /// Clears session state ahead of a fresh join attempt (invariant: a
    /// forced rejoin never observably re-uses the old session keys).
    pub fn begin_join(&mut self) {
        self.is_joined = false;
        self.dev_addr = [0u8; 4];
        self.nwk_skey = Key16::zero();
        self.app_skey = Key16::zero();
    }

    /// Installs a freshly derived session after JoinAccept MIC verification
    /// (invariants 1 and 4, §3).
    pub fn complete_join(&mut self, dev_addr: [u8; 4], nwk_skey: Key16, app_skey: Key16) {
        self.dev_addr = dev_addr;
        self.nwk_skey = nwk_skey;
        self.app_skey = app_skey;
        self.fcnt = 0;
        self.fcnt_down = 0;
        self.is_joined = true;
    }

    /// Advances the US915 channel-group rotation by one step, wrapping and
    /// recomputing the uplink channel window when the new group would
    /// exceed the region's channel range (§4.6 "channel-group rotation").
    pub fn rotate_channel_group(&mut self) {
        self.channel_group = (self.channel_group + 1) % 8;
        let width = 8u8;
        let proposed_max = self.channel_group.saturating_mul(width) + (width - 1);
        if proposed_max > self.region.uplink_channel_max() {
            self.channel_group = 0;
        }
        self.uplink_channel_min = self.channel_group * width;
        self.uplink_channel_max =
            (self.uplink_channel_min + width - 1).min(self.region.uplink_channel_max());
    }
}
