//! # Persistence Store (C3)
//!
//! Durable key-value mapping of `DeviceRecord` keyed by DevEUI hex. Modeled
//! on the compact JSON-file cache the wM-Bus frame cache uses: the whole
//! table lives in memory behind a mutex and is rewritten to disk on every
//! mutation, so a mutation is durable before the caller proceeds (§4.2).
//!
//! A single writer is enforced by the `Mutex`; foreground (`transmit`) and
//! background (scheduler) contexts share one `Arc<JsonFileStore>`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::device::DeviceRecord;
use crate::error::PersistenceError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    devices: HashMap<String, DeviceRecord>,
}

/// File-backed device table. `devices.json` (or whatever path is given) is
/// the single source of truth; every call that mutates a record rewrites
/// the file before returning.
pub struct JsonFileStore {
    path: PathBuf,
    inner: Mutex<StoreData>,
}

impl JsonFileStore {
    /// Opens (or creates) the store at `path`, loading any existing table.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                StoreData::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            StoreData::default()
        };
        Ok(Self {
            path,
            inner: Mutex::new(data),
        })
    }

    fn flush(&self, data: &StoreData) -> Result<(), PersistenceError> {
        let serialized = serde_json::to_string_pretty(data)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serialized)?;
        Ok(())
    }

    /// Ensures the backing file exists; a no-op once `open` has run.
    pub fn ensure_schema(&self) -> Result<(), PersistenceError> {
        let data = self.inner.lock().unwrap();
        self.flush(&data)
    }

    /// Looks up a record by DevEUI hex.
    pub fn get(&self, dev_eui_hex: &str) -> Option<DeviceRecord> {
        self.inner.lock().unwrap().devices.get(dev_eui_hex).cloned()
    }

    /// Inserts a freshly provisioned record. Idempotent on DevEUI: an
    /// existing record for the same DevEUI is left untouched.
    pub fn insert(&self, record: DeviceRecord) -> Result<DeviceRecord, PersistenceError> {
        let key = record.dev_eui_hex();
        let mut data = self.inner.lock().unwrap();
        let existing = data.devices.entry(key).or_insert(record).clone();
        self.flush(&data)?;
        Ok(existing)
    }

    /// Persists a new DevNonce (invariant 3, §3: durable before the
    /// JoinRequest is emitted).
    pub fn update_dev_nonce(&self, dev_eui_hex: &str, dev_nonce: u16) -> Result<(), PersistenceError> {
        self.mutate(dev_eui_hex, |r| r.dev_nonce = dev_nonce)
    }

    /// Persists the uplink frame counter (must happen before TX per the
    /// engine's write-ahead discipline, §4.6 "Failure model").
    pub fn update_fcnt(&self, dev_eui_hex: &str, fcnt: u32) -> Result<(), PersistenceError> {
        self.mutate(dev_eui_hex, |r| r.fcnt = fcnt)
    }

    /// Persists the last observed downlink frame counter.
    pub fn update_fcnt_down(&self, dev_eui_hex: &str, fcnt_down: u32) -> Result<(), PersistenceError> {
        self.mutate(dev_eui_hex, |r| r.fcnt_down = fcnt_down)
    }

    /// Persists a freshly derived session (invariant 4: only ever called
    /// after MIC verification succeeds).
    pub fn update_session_keys(
        &self,
        dev_eui_hex: &str,
        dev_addr: [u8; 4],
        nwk_skey: crate::device::Key16,
        app_skey: crate::device::Key16,
    ) -> Result<(), PersistenceError> {
        self.mutate(dev_eui_hex, |r| {
            r.dev_addr = dev_addr;
            r.nwk_skey = nwk_skey.clone();
            r.app_skey = app_skey.clone();
            r.fcnt = 0;
            r.fcnt_down = 0;
            r.is_joined = true;
        })
    }

    /// Persists the US915 channel-group rotation.
    pub fn update_channel_group(
        &self,
        dev_eui_hex: &str,
        channel_group: u8,
        uplink_channel_min: u8,
        uplink_channel_max: u8,
    ) -> Result<(), PersistenceError> {
        self.mutate(dev_eui_hex, |r| {
            r.channel_group = channel_group;
            r.uplink_channel_min = uplink_channel_min;
            r.uplink_channel_max = uplink_channel_max;
        })
    }

    fn mutate(
        &self,
        dev_eui_hex: &str,
        f: impl FnOnce(&mut DeviceRecord),
    ) -> Result<(), PersistenceError> {
        let mut data = self.inner.lock().unwrap();
        let record = data
            .devices
            .get_mut(dev_eui_hex)
            .ok_or_else(|| PersistenceError::NotFound(dev_eui_hex.to_string()))?;
        f(record);
        self.flush(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Region;

    fn sample_record() -> DeviceRecord {
        DeviceRecord::provision(
            &hex::decode("1d42fbec13160990").unwrap(),
            &hex::decode("1d42fbec13160990").unwrap(),
            &hex::decode("4fe6e906d37fd200f25f82f7df6ba0dd").unwrap(),
            Region::Eu868,
        )
        .unwrap()
    }

    #[test]
    fn insert_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("devices.json")).unwrap();
        let record = sample_record();
        let key = record.dev_eui_hex();
        store.insert(record).unwrap();
        let loaded = store.get(&key).unwrap();
        assert_eq!(loaded.dev_eui_hex(), key);
    }

    #[test]
    fn insert_is_idempotent_on_dev_eui() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("devices.json")).unwrap();
        let mut record = sample_record();
        let key = record.dev_eui_hex();
        store.insert(record.clone()).unwrap();
        record.fcnt = 99;
        store.insert(record).unwrap();
        assert_eq!(store.get(&key).unwrap().fcnt, 0);
    }

    #[test]
    fn mutations_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        let record = sample_record();
        let key = record.dev_eui_hex();
        {
            let store = JsonFileStore::open(&path).unwrap();
            store.insert(record).unwrap();
            store.update_fcnt(&key, 7).unwrap();
            store.update_dev_nonce(&key, 0x1234).unwrap();
        }
        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.get(&key).unwrap();
        assert_eq!(loaded.fcnt, 7);
        assert_eq!(loaded.dev_nonce, 0x1234);
    }

    #[test]
    fn update_on_missing_device_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("devices.json")).unwrap();
        assert!(store.update_fcnt("deadbeefdeadbeef", 1).is_err());
    }
}
