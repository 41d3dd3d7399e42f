//! Scenario 6 (§8): receiving the same encrypted downlink twice decodes
//! both times but only delivers the application payload and accumulates
//! MAC-command answers once.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lorawan_mac::{Callbacks, ReceiveStatus, Region};

#[tokio::test(start_paused = true)]
async fn replayed_downlink_is_not_redelivered() {
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

    let downlink = common::build_data_down(false, false, false, b"hi", 0, 5, dev_addr, &nwk_skey, &app_skey, &[]);

    handle.push_rx(downlink.clone(), -45.0, 7.5);
    handle.push_rx(downlink, -45.0, 7.5);

    tokio::time::advance(Duration::from_millis(1_500)).await;
    tokio::task::yield_now().await;

    let events = received.lock().unwrap();
    assert_eq!(events.len(), 1, "a replayed downlink must not be redelivered to the application");
    assert_eq!(events[0], (ReceiveStatus::RxOk, Some(5), b"hi".to_vec()));

    engine.shutdown().await;
}
