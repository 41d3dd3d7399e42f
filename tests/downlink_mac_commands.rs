//! Scenario 3 (§8): a confirmed downlink carrying LinkADRReq in FOpts makes
//! the engine stack-transmit LinkADRAns with all three ack bits set.

mod common;

use lorawan_mac::codec::decode_data_down;
use lorawan_mac::Region;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn link_adr_request_triggers_full_ack_stack_transmit() {
    let dev_addr = [0x26, 0x01, 0x1b, 0xda];
    let (engine, handle, nwk_skey, app_skey, _dir) =
        common::join_engine(common::DEV_EUI, common::APP_EUI, common::APP_KEY, Region::Eu868, dev_addr).await;

    let sent_before_downlink = handle.sent_frames().len();

    // LinkADRReq: CID 0x03, DataRate/TXPower, 2-byte ChMask, Redundancy.
    let link_adr_req = [0x03, 0x50, 0x03, 0x00, 0x01];
    let downlink = common::build_data_down(
        true,
        false,
        false,
        &[],
        0,
        0,
        dev_addr,
        &nwk_skey,
        &app_skey,
        &link_adr_req,
    );
    handle.push_rx(downlink, -50.0, 8.0);

    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;

    let sent = handle.sent_frames();
    assert_eq!(
        sent.len(),
        sent_before_downlink + 1,
        "the LinkADRReq should trigger exactly one stack-transmitted uplink"
    );

    let mut up = sent.last().unwrap().clone();
    assert_eq!(up[0], 0x40, "stack-transmit uplink should be unconfirmed");
    up[0] = (up[0] & 0b0001_1111) | (0b011 << 5);

    let decoded = decode_data_down(&up, dev_addr, &nwk_skey, &app_skey, 0).unwrap();
    assert_eq!(decoded.fcnt16, 1);
    assert_eq!(decoded.f_port, None, "the MAC answer rides in FOpts, no application payload");
    assert_eq!(decoded.fopts, vec![0x03, 0b111], "LinkADRAns: power/data-rate/channel-mask all acked");

    engine.shutdown().await;
}
