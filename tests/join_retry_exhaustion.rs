//! Scenario 5 (§8): with no JoinAccept ever arriving, a 3-try join budget
//! sends exactly three JoinRequests, each with a distinct DevNonce, then
//! reports `JoinMaxTryError` exactly once.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lorawan_mac::radio::mock::SharedMockRadio;
use lorawan_mac::{Callbacks, JoinStatus, JsonFileStore, MacEngine, Region};

#[tokio::test(start_paused = true)]
async fn exhausting_the_join_budget_reports_max_try_error_once() {
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

    // Every retry round is JOIN_RX1_DELAY (5s) + JOIN_RX2_DELAY (6s); three
    // rounds plus margin comfortably exhausts the budget.
    for _ in 0..4 {
        tokio::time::advance(Duration::from_secs(12)).await;
        tokio::task::yield_now().await;
    }

    let sent = handle.sent_frames();
    assert_eq!(sent.len(), 3, "exactly three JoinRequests should have been transmitted");

    let nonces: Vec<u16> = sent.iter().map(|f| common::dev_nonce_from_join_request(f)).collect();
    assert_ne!(nonces[0], nonces[1]);
    assert_ne!(nonces[1], nonces[2]);
    assert_ne!(nonces[0], nonces[2]);

    assert_eq!(
        join_events.lock().unwrap().as_slice(),
        &[JoinStatus::JoinMaxTryError],
        "only the final, exhausted attempt should fire on_join"
    );
    assert!(!engine.is_joined().await);

    let stored = JsonFileStore::open(dir.path().join("devices.json"))
        .unwrap()
        .get(common::DEV_EUI)
        .unwrap();
    assert_eq!(stored.dev_nonce, nonces[2], "the last persisted DevNonce matches the last JoinRequest sent");

    engine.shutdown().await;
}
