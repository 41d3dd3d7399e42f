//! Two distinct downlinks with an incrementing FCntDown must both decode:
//! the engine only ever held `fcnt=0` in scenario 6's replay test, which
//! never exercised reconstructing the wire FCnt16 against a nonzero prior
//! counter.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lorawan_mac::{Callbacks, ReceiveStatus, Region};

#[tokio::test(start_paused = true)]
async fn sequential_downlinks_with_incrementing_fcnt_both_decode() {
    let dev_addr = [0x26, 0x01, 0x1b, 0xda];
    let (engine, handle, nwk_skey, app_skey, _dir) =
        common::join_engine(common::DEV_EUI, common::APP_EUI, common::APP_KEY, Region::Eu868, dev_addr).await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let received_clone = received.clone();
    engine
        .set_callbacks(Callbacks {
            on_join: None,
            on_transmit: None,
            on_receive: Some(Box::new(move |status, port, payload| {
                received_clone.lock().unwrap().push((status, port, payload));
            })),
        })
        .await;

    let first = common::build_data_down(false, false, false, b"one", 0, 5, dev_addr, &nwk_skey, &app_skey, &[]);
    handle.push_rx(first, -45.0, 7.5);
    tokio::time::advance(Duration::from_millis(1_500)).await;
    tokio::task::yield_now().await;

    let second = common::build_data_down(false, false, false, b"two", 1, 5, dev_addr, &nwk_skey, &app_skey, &[]);
    handle.push_rx(second, -45.0, 7.5);
    tokio::time::advance(Duration::from_millis(1_500)).await;
    tokio::task::yield_now().await;

    let events = received.lock().unwrap();
    assert_eq!(events.len(), 2, "both distinct downlinks must be delivered, not just the first");
    assert_eq!(events[0], (ReceiveStatus::RxOk, Some(5), b"one".to_vec()));
    assert_eq!(events[1], (ReceiveStatus::RxOk, Some(5), b"two".to_vec()));

    engine.shutdown().await;
}
