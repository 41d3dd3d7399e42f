//! Scenario 1 (§8): fresh OTAA join on EU868 transitions Unjoined → Joined
//! with session keys matching the LoRaWAN 1.0.2 derivation.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lorawan_mac::codec::crypto::aes128_ecb_encrypt_block;
use lorawan_mac::device::Key16;
use lorawan_mac::radio::mock::SharedMockRadio;
use lorawan_mac::{Callbacks, JoinStatus, JsonFileStore, MacEngine, Region};

/// NwkSKey/AppSKey derivation mirrored from `codec::derive_session_key`,
/// which is private to the crate; this is the network server's side of the
/// same computation.
fn derive_session_key(app_key: &Key16, tag: u8, app_nonce: &[u8], net_id: &[u8], dev_nonce: u16) -> Key16 {
    let mut block = [0u8; 16];
    block[0] = tag;
    block[1..4].copy_from_slice(app_nonce);
    block[4..7].copy_from_slice(net_id);
    block[7..9].copy_from_slice(&dev_nonce.to_le_bytes());
    Key16(aes128_ecb_encrypt_block(&app_key.0, &block))
}

#[tokio::test(start_paused = true)]
async fn fresh_join_transitions_to_joined_with_matching_session_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path().join("devices.json")).unwrap());

    let radio = SharedMockRadio::new();
    let handle = radio.clone();

    let engine = MacEngine::new(
        radio,
        store,
        &hex::decode(common::DEV_EUI).unwrap(),
        &hex::decode(common::APP_EUI).unwrap(),
        &hex::decode(common::APP_KEY).unwrap(),
        Region::Eu868,
    )
    .await
    .unwrap();

    let join_events = Arc::new(Mutex::new(Vec::new()));
    let join_events_clone = join_events.clone();
    engine
        .set_callbacks(Callbacks {
            on_join: Some(Box::new(move |status| join_events_clone.lock().unwrap().push(status))),
            on_transmit: None,
            on_receive: None,
        })
        .await;

    assert!(engine.join(3, false).await);

    let sent = handle.sent_frames();
    assert_eq!(sent.len(), 1, "exactly one JoinRequest should have been transmitted");
    let dev_nonce = common::dev_nonce_from_join_request(&sent[0]);

    let app_key = Key16(hex::decode(common::APP_KEY).unwrap().try_into().unwrap());
    let app_nonce = [0x01, 0x00, 0x00];
    let net_id = [0x13, 0x00, 0x00];
    let dev_addr = [0x26, 0x01, 0x1b, 0xda];
    let join_accept = common::build_join_accept(&app_key, app_nonce, net_id, dev_addr, 1);
    handle.push_rx(join_accept, -42.0, 9.5);

    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;

    assert!(engine.is_joined().await);
    assert_eq!(join_events.lock().unwrap().as_slice(), &[JoinStatus::JoinOk]);

    let expected_nwk_skey = derive_session_key(&app_key, 0x01, &app_nonce, &net_id, dev_nonce);
    let expected_app_skey = derive_session_key(&app_key, 0x02, &app_nonce, &net_id, dev_nonce);

    let stored = {
        let s = JsonFileStore::open(dir.path().join("devices.json")).unwrap();
        s.get(common::DEV_EUI).unwrap()
    };
    assert_eq!(stored.dev_addr, dev_addr);
    assert_eq!(stored.nwk_skey.0, expected_nwk_skey.0);
    assert_eq!(stored.app_skey.0, expected_app_skey.0);

    engine.shutdown().await;
}
