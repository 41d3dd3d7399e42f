//! Scenario 2 (§8): an unconfirmed uplink sent right after a fresh join
//! frames correctly (MHDR, FCnt, MIC).

mod common;

use lorawan_mac::codec::{decode_data_down, DownlinkFCtrlFlags};
use lorawan_mac::Region;

#[tokio::test(start_paused = true)]
async fn unconfirmed_uplink_frames_correctly_after_join() {
    let dev_addr = [0x26, 0x01, 0x1b, 0xda];
    let (engine, handle, nwk_skey, app_skey, _dir) =
        common::join_engine(common::DEV_EUI, common::APP_EUI, common::APP_KEY, Region::Eu868, dev_addr).await;

    let payload = b"hello-world!";
    assert!(engine.transmit(payload, false).await);

    let sent = handle.sent_frames();
    let mut up = sent.last().expect("one uplink should have been sent").clone();
    assert_eq!(up[0], 0x40, "MHDR should be UnconfirmedDataUp");

    // Flip MType up -> down to reuse the downlink decoder, the same trick
    // the codec's own round-trip test uses.
    up[0] = (up[0] & 0b0001_1111) | (0b011 << 5);
    let decoded = decode_data_down(&up, dev_addr, &nwk_skey, &app_skey, 0).unwrap();

    assert_eq!(decoded.fcnt16, 1, "first post-join uplink should carry FCnt 1");
    assert_eq!(decoded.f_port, Some(2), "default application FPort");
    assert_eq!(decoded.mac_payload, payload);
    assert!(!decoded.fctrl.contains(DownlinkFCtrlFlags::ACK));

    engine.shutdown().await;
}
