//! Shared fixtures for the end-to-end scenario tests (§8).
//!
//! Builds wire-format frames the way a join server / network server would,
//! using the same AES/CMAC primitives the device-side codec exposes
//! publicly plus a hand-rolled AES decrypt (the one operation the codec
//! never needs on the device side, since the JoinAccept "encrypt-as-decrypt"
//! trick only runs in the network→device direction).

use std::sync::Arc;
use std::time::Duration;

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, KeyInit};
use aes::Aes128;

use lorawan_mac::codec::crypto::{aes128_cmac, apply_keystream, Direction};
use lorawan_mac::device::Key16;
use lorawan_mac::radio::mock::SharedMockRadio;
use lorawan_mac::{JsonFileStore, MacEngine, Region};

pub const DEV_EUI: &str = "1d42fbec13160990";
pub const APP_EUI: &str = "1d42fbec13160990";
pub const APP_KEY: &str = "4fe6e906d37fd200f25f82f7df6ba0dd";

fn aes128_ecb_decrypt_block(key: &[u8; 16], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut buf = GenericArray::clone_from_slice(block);
    cipher.decrypt_block(&mut buf);
    buf.into()
}

/// Builds a valid JoinAccept PHYPayload. Session-key derivation on the
/// device side uses the DevNonce it transmitted itself, so this fixture
/// (mirroring the network server) never needs to see it.
pub fn build_join_accept(
    app_key: &Key16,
    app_nonce: [u8; 3],
    net_id: [u8; 3],
    dev_addr: [u8; 4],
    rx_delay: u8,
) -> Vec<u8> {
    const MHDR: u8 = 0b001 << 5; // JoinAccept

    let mut plaintext = Vec::with_capacity(12);
    plaintext.extend_from_slice(&app_nonce);
    plaintext.extend_from_slice(&net_id);
    plaintext.extend_from_slice(&dev_addr);
    plaintext.push(0x00); // DLSettings: RX1DROffset=0, RX2DataRate=0
    plaintext.push(rx_delay);

    let mut mic_input = Vec::with_capacity(1 + plaintext.len());
    mic_input.push(MHDR);
    mic_input.extend_from_slice(&plaintext);
    let mic = aes128_cmac(&app_key.0, &mic_input);

    let mut body = plaintext.clone();
    body.extend_from_slice(&mic);

    // The network server encrypts the body with AES-decrypt so the device
    // recovers it with AES-encrypt; see codec::decode_join_accept.
    let mut ciphertext = vec![0u8; body.len()];
    for (chunk_idx, chunk) in body.chunks(16).enumerate() {
        let mut block = [0u8; 16];
        block[..chunk.len()].copy_from_slice(chunk);
        let out = aes128_ecb_decrypt_block(&app_key.0, &block);
        let start = chunk_idx * 16;
        ciphertext[start..start + chunk.len()].copy_from_slice(&out[..chunk.len()]);
    }

    let mut phy = vec![MHDR];
    phy.extend_from_slice(&ciphertext);
    phy
}

/// Reads the DevNonce the engine embedded in its most recent JoinRequest.
pub fn dev_nonce_from_join_request(phy_payload: &[u8]) -> u16 {
    u16::from_le_bytes([phy_payload[17], phy_payload[18]])
}

/// Builds a valid DataDown PHYPayload, the network-side mirror of
/// `encode_data_up`.
#[allow(clippy::too_many_arguments)]
pub fn build_data_down(
    confirmed: bool,
    ack: bool,
    f_pending: bool,
    mac_payload: &[u8],
    fcnt: u32,
    f_port: u8,
    dev_addr: [u8; 4],
    nwk_skey: &Key16,
    app_skey: &Key16,
    fopts: &[u8],
) -> Vec<u8> {
    let mhdr = if confirmed { 0b101 << 5 } else { 0b011 << 5 };

    let mut fctrl = 0u8;
    if ack {
        fctrl |= 0b0010_0000;
    }
    if f_pending {
        fctrl |= 0b0001_0000;
    }
    fctrl |= fopts.len() as u8 & 0b0000_1111;

    let dev_addr_u32 = u32::from_le_bytes(dev_addr);

    let mut buf = vec![mhdr];
    buf.extend_from_slice(&dev_addr_u32.to_le_bytes());
    buf.push(fctrl);
    buf.extend_from_slice(&(fcnt as u16).to_le_bytes());
    buf.extend_from_slice(fopts);

    if !mac_payload.is_empty() || f_port != 0 {
        buf.push(f_port);
        let key = if f_port == 0 { nwk_skey } else { app_skey };
        let mut encrypted = mac_payload.to_vec();
        apply_keystream(&key.0, Direction::Down, dev_addr_u32, fcnt, &mut encrypted);
        buf.extend_from_slice(&encrypted);
    }

    let b0 = lorawan_mac::codec::crypto::b0_block(Direction::Down, dev_addr_u32, fcnt, buf.len() as u8);
    let mut mic_input = b0.to_vec();
    mic_input.extend_from_slice(&buf);
    let mic = aes128_cmac(&nwk_skey.0, &mic_input);
    buf.extend_from_slice(&mic);
    buf
}

/// Runs a complete OTAA join against a fresh engine and waits for it to
/// settle, for scenarios that only care about post-join behavior. Keeps the
/// returned `TempDir` alive for as long as the caller needs the persistence
/// file to keep working.
pub async fn join_engine(
    dev_eui_hex: &str,
    app_eui_hex: &str,
    app_key_hex: &str,
    region: Region,
    dev_addr: [u8; 4],
) -> (
    Arc<MacEngine<SharedMockRadio>>,
    SharedMockRadio,
    Key16,
    Key16,
    tempfile::TempDir,
) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path().join("devices.json")).unwrap());

    let radio = SharedMockRadio::new();
    let handle = radio.clone();

    let engine = MacEngine::new(
        radio,
        store,
        &hex::decode(dev_eui_hex).unwrap(),
        &hex::decode(app_eui_hex).unwrap(),
        &hex::decode(app_key_hex).unwrap(),
        region,
    )
    .await
    .unwrap();

    assert!(engine.join(3, false).await);

    let app_key = Key16(hex::decode(app_key_hex).unwrap().try_into().unwrap());
    let app_nonce = [0x01, 0x00, 0x00];
    let net_id = [0x13, 0x00, 0x00];
    let join_accept = build_join_accept(&app_key, app_nonce, net_id, dev_addr, 1);
    handle.push_rx(join_accept, -42.0, 9.5);

    tokio::time::advance(Duration::from_millis(250)).await;
    tokio::task::yield_now().await;
    assert!(engine.is_joined().await, "join did not complete within the scheduler tick");

    let stored = {
        let s = JsonFileStore::open(dir.path().join("devices.json")).unwrap();
        s.get(dev_eui_hex).unwrap()
    };

    (engine, handle, stored.nwk_skey, stored.app_skey, dir)
}
