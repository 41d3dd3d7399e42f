//! # Frame Codec (C4)
//!
//! Pure, stateless LoRaWAN 1.0.2 PHYPayload encode/decode. No module here
//! touches the network, the clock, or any mutable device state; every
//! function takes value types and returns an owned buffer or a decoded
//! struct, so it is trivially unit-testable without a radio or a device
//! record in scope.
//!
//! There is no prior-language implementation of this module to adapt: the
//! reference firmware binds to a compiled library over FFI for exactly this
//! logic. The formulas below are the LoRaWAN 1.0.2 spec's own, wired up
//! with this workspace's AES/CMAC crates the way [`crate::device`] wires
//! `zeroize` for key material.

pub mod crypto;

use bitflags::bitflags;

use crate::device::Key16;
use crate::error::CodecError;
use self::crypto::{aes128_cmac, aes128_ecb_encrypt_block, apply_keystream, b0_block, Direction};

/// MHDR message type, the top 3 bits of the first PHYPayload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MType {
    JoinRequest,
    JoinAccept,
    UnconfirmedDataUp,
    UnconfirmedDataDown,
    ConfirmedDataUp,
    ConfirmedDataDown,
    RfuA,
    Proprietary,
}

impl MType {
    fn from_mhdr(mhdr: u8) -> Self {
        match mhdr >> 5 {
            0b000 => MType::JoinRequest,
            0b001 => MType::JoinAccept,
            0b010 => MType::UnconfirmedDataUp,
            0b011 => MType::UnconfirmedDataDown,
            0b100 => MType::ConfirmedDataUp,
            0b101 => MType::ConfirmedDataDown,
            0b110 => MType::RfuA,
            _ => MType::Proprietary,
        }
    }

    fn mhdr_byte(self) -> u8 {
        let mtype = match self {
            MType::JoinRequest => 0b000,
            MType::JoinAccept => 0b001,
            MType::UnconfirmedDataUp => 0b010,
            MType::UnconfirmedDataDown => 0b011,
            MType::ConfirmedDataUp => 0b100,
            MType::ConfirmedDataDown => 0b101,
            MType::RfuA => 0b110,
            MType::Proprietary => 0b111,
        };
        // Major version 0 (LoRaWAN R1), RFU bits zero.
        mtype << 5
    }

    pub fn is_confirmed_up(self) -> bool {
        matches!(self, MType::ConfirmedDataUp)
    }
}

/// Inspects the MHDR of a PHYPayload. Fails when shorter than 1 byte.
pub fn message_type(phy_payload: &[u8]) -> Result<MType, CodecError> {
    if phy_payload.is_empty() {
        return Err(CodecError::MalformedPhy("empty PHYPayload".into()));
    }
    Ok(MType::from_mhdr(phy_payload[0]))
}

bitflags! {
    /// Uplink frame-control flags (FHDR.FCtrl, device→network direction).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UplinkFCtrlFlags: u8 {
        const ADR          = 0b1000_0000;
        const ADR_ACK_REQ  = 0b0100_0000;
        const ACK          = 0b0010_0000;
        const CLASS_B      = 0b0001_0000;
    }

    /// Downlink frame-control flags (FHDR.FCtrl, network→device direction).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DownlinkFCtrlFlags: u8 {
        const ADR       = 0b1000_0000;
        const RFU       = 0b0100_0000;
        const ACK       = 0b0010_0000;
        const F_PENDING = 0b0001_0000;
    }
}

const FOPTS_LEN_MASK: u8 = 0b0000_1111;

/// Builds a JoinRequest PHYPayload: `MHDR‖AppEUI‖DevEUI‖DevNonce‖MIC`.
///
/// AppEUI and DevEUI are each transmitted little-endian (the wire order is
/// the reverse of how they're usually printed as hex).
pub fn encode_join_request(
    dev_eui: &[u8; 8],
    app_eui: &[u8; 8],
    app_key: &Key16,
    dev_nonce: u16,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(23);
    buf.push(MType::JoinRequest.mhdr_byte());
    buf.extend_from_slice(&reversed(app_eui));
    buf.extend_from_slice(&reversed(dev_eui));
    buf.extend_from_slice(&dev_nonce.to_le_bytes());

    let mic = aes128_cmac(&app_key.0, &buf);
    buf.extend_from_slice(&mic);
    buf
}

/// Decoded JoinAccept payload plus the derived session.
#[derive(Debug, Clone)]
pub struct JoinAccept {
    pub dev_addr: [u8; 4],
    pub nwk_skey: Key16,
    pub app_skey: Key16,
    pub rx_delay: u8,
    pub dl_settings: u8,
    pub cflist: Option<[u8; 16]>,
}

/// Decrypts, verifies and derives session keys from a JoinAccept
/// PHYPayload.
///
/// The network server builds the JoinAccept body with an AES **decrypt**
/// operation under AppKey so that the device recovers it by running AES
/// **encrypt** on the ciphertext — the inverse of every other LoRaWAN
/// frame, which encrypts on the uplink side and decrypts on the downlink
/// side. This is intentional per LoRaWAN 1.0.2 §6.2.5, not a mistake to
/// correct.
pub fn decode_join_accept(
    phy_payload: &[u8],
    app_key: &Key16,
    dev_nonce: u16,
) -> Result<JoinAccept, CodecError> {
    if phy_payload.len() != 17 && phy_payload.len() != 33 {
        return Err(CodecError::LengthError {
            expected: 17,
            actual: phy_payload.len(),
        });
    }
    let mhdr = phy_payload[0];
    let body = &phy_payload[1..];

    let mut decrypted = vec![0u8; body.len()];
    for (chunk_idx, chunk) in body.chunks(16).enumerate() {
        let mut block = [0u8; 16];
        block[..chunk.len()].copy_from_slice(chunk);
        let out = aes128_ecb_encrypt_block(&app_key.0, &block);
        let start = chunk_idx * 16;
        decrypted[start..start + chunk.len()].copy_from_slice(&out[..chunk.len()]);
    }

    let mic_offset = decrypted.len() - 4;
    let mut mic_input = Vec::with_capacity(1 + mic_offset);
    mic_input.push(mhdr);
    mic_input.extend_from_slice(&decrypted[..mic_offset]);
    let expected_mic = aes128_cmac(&app_key.0, &mic_input);
    if expected_mic != decrypted[mic_offset..] {
        return Err(CodecError::MicError);
    }

    let app_nonce = &decrypted[0..3];
    let net_id = &decrypted[3..6];
    let mut dev_addr = [0u8; 4];
    dev_addr.copy_from_slice(&decrypted[6..10]);
    let dl_settings = decrypted[10];
    let rx_delay = decrypted[11];
    let cflist = if decrypted.len() >= 12 + 16 + 4 {
        let mut cf = [0u8; 16];
        cf.copy_from_slice(&decrypted[12..28]);
        Some(cf)
    } else {
        None
    };

    let nwk_skey = derive_session_key(app_key, 0x01, app_nonce, net_id, dev_nonce);
    let app_skey = derive_session_key(app_key, 0x02, app_nonce, net_id, dev_nonce);

    Ok(JoinAccept {
        dev_addr,
        nwk_skey,
        app_skey,
        rx_delay,
        dl_settings,
        cflist,
    })
}

/// NwkSKey = AES(AppKey, 0x01‖AppNonce‖NetID‖DevNonce‖pad16);
/// AppSKey = AES(AppKey, 0x02‖AppNonce‖NetID‖DevNonce‖pad16).
fn derive_session_key(
    app_key: &Key16,
    tag: u8,
    app_nonce: &[u8],
    net_id: &[u8],
    dev_nonce: u16,
) -> Key16 {
    let mut block = [0u8; 16];
    block[0] = tag;
    block[1..4].copy_from_slice(app_nonce);
    block[4..7].copy_from_slice(net_id);
    block[7..9].copy_from_slice(&dev_nonce.to_le_bytes());
    // remaining bytes are the zero pad
    Key16(aes128_ecb_encrypt_block(&app_key.0, &block))
}

fn reversed(bytes: &[u8; 8]) -> [u8; 8] {
    let mut out = *bytes;
    out.reverse();
    out
}

fn dev_addr_u32(dev_addr: [u8; 4]) -> u32 {
    u32::from_le_bytes(dev_addr)
}

/// Builds an uplink DataUp PHYPayload.
///
/// `fopts` carries piggybacked MAC-command answers (≤15 bytes, §4.5);
/// payload is encrypted under `app_skey` when `f_port > 0`, or under
/// `nwk_skey` when `f_port == 0` (a MAC-command-only uplink).
#[allow(clippy::too_many_arguments)]
pub fn encode_data_up(
    confirmed: bool,
    mac_payload: &[u8],
    fcnt: u32,
    f_port: u8,
    dev_addr: [u8; 4],
    nwk_skey: &Key16,
    app_skey: &Key16,
    adr: bool,
    ack: bool,
    fopts: &[u8],
) -> Result<Vec<u8>, CodecError> {
    if fopts.len() > 15 {
        return Err(CodecError::FOptsTooLong(fopts.len()));
    }

    let mtype = if confirmed {
        MType::ConfirmedDataUp
    } else {
        MType::UnconfirmedDataUp
    };

    let mut fctrl = UplinkFCtrlFlags::empty();
    if adr {
        fctrl |= UplinkFCtrlFlags::ADR;
    }
    if ack {
        fctrl |= UplinkFCtrlFlags::ACK;
    }
    let fctrl_byte = fctrl.bits() | (fopts.len() as u8 & FOPTS_LEN_MASK);

    let mut buf = Vec::with_capacity(12 + mac_payload.len() + fopts.len());
    buf.push(mtype.mhdr_byte());
    buf.extend_from_slice(&dev_addr_u32(dev_addr).to_le_bytes());
    buf.push(fctrl_byte);
    buf.extend_from_slice(&(fcnt as u16).to_le_bytes());
    buf.extend_from_slice(fopts);

    if !mac_payload.is_empty() || f_port != 0 {
        buf.push(f_port);
        let key = if f_port == 0 { nwk_skey } else { app_skey };
        let mut encrypted = mac_payload.to_vec();
        apply_keystream(&key.0, Direction::Up, dev_addr_u32(dev_addr), fcnt, &mut encrypted);
        buf.extend_from_slice(&encrypted);
    }

    let b0 = b0_block(Direction::Up, dev_addr_u32(dev_addr), fcnt, buf.len() as u8);
    let mut mic_input = b0.to_vec();
    mic_input.extend_from_slice(&buf);
    let mic = aes128_cmac(&nwk_skey.0, &mic_input);
    buf.extend_from_slice(&mic);
    Ok(buf)
}

/// Decoded DataDown frame.
#[derive(Debug, Clone)]
pub struct DecodedDown {
    pub confirmed: bool,
    pub fctrl: DownlinkFCtrlFlags,
    pub fcnt16: u16,
    /// The reconstructed 32-bit counter (`fcnt_upper16 ‖ fcnt16`) actually
    /// used for the MIC and keystream, for C7 to persist and feed back as
    /// the next call's `fcnt_upper16` (§4.3 numeric semantics).
    pub fcnt32: u32,
    pub fopts: Vec<u8>,
    pub f_port: Option<u8>,
    pub mac_payload: Vec<u8>,
}

/// Decodes and decrypts a DataDown PHYPayload addressed to `dev_addr`.
///
/// The wire `FCnt16` is always read straight off the frame; `fcnt_upper16`
/// is the upper 16 bits of the 32-bit counter C7 tracks across rollover
/// (§4.3 numeric semantics), and the two are combined here as
/// `fcnt32 = (fcnt_upper16 << 16) | fcnt16` before it's used for both the
/// keystream and the B0 MIC block. The codec never trusts a caller-supplied
/// low 16 bits, since those always belong on the wire.
pub fn decode_data_down(
    phy_payload: &[u8],
    dev_addr: [u8; 4],
    nwk_skey: &Key16,
    app_skey: &Key16,
    fcnt_upper16: u16,
) -> Result<DecodedDown, CodecError> {
    if phy_payload.len() < 12 {
        return Err(CodecError::LengthError {
            expected: 12,
            actual: phy_payload.len(),
        });
    }
    let mtype = MType::from_mhdr(phy_payload[0]);
    let confirmed = match mtype {
        MType::ConfirmedDataDown => true,
        MType::UnconfirmedDataDown => false,
        _ => {
            return Err(CodecError::MalformedPhy(format!(
                "expected a data-down message type, got {mtype:?}"
            )))
        }
    };

    let mut wire_addr = [0u8; 4];
    wire_addr.copy_from_slice(&phy_payload[1..5]);
    let wire_addr_u32 = u32::from_le_bytes(wire_addr);
    let expected_addr_u32 = dev_addr_u32(dev_addr);
    if wire_addr_u32 != expected_addr_u32 {
        return Err(CodecError::DevAddrMismatch {
            expected: expected_addr_u32,
            actual: wire_addr_u32,
        });
    }

    let fctrl_byte = phy_payload[5];
    let fctrl = DownlinkFCtrlFlags::from_bits_truncate(fctrl_byte);
    let fopts_len = (fctrl_byte & FOPTS_LEN_MASK) as usize;

    let fcnt16 = u16::from_le_bytes([phy_payload[6], phy_payload[7]]);
    let fcnt32 = ((fcnt_upper16 as u32) << 16) | fcnt16 as u32;

    let mut offset = 8;
    if phy_payload.len() < offset + fopts_len {
        return Err(CodecError::LengthError {
            expected: offset + fopts_len,
            actual: phy_payload.len(),
        });
    }
    let fopts = phy_payload[offset..offset + fopts_len].to_vec();
    offset += fopts_len;

    if phy_payload.len() < offset + 4 {
        return Err(CodecError::LengthError {
            expected: offset + 4,
            actual: phy_payload.len(),
        });
    }
    let body_end = phy_payload.len() - 4;

    let (f_port, mac_payload) = if offset < body_end {
        let f_port = phy_payload[offset];
        let ciphertext = &phy_payload[offset + 1..body_end];
        let key = if f_port == 0 { nwk_skey } else { app_skey };
        let mut plaintext = ciphertext.to_vec();
        apply_keystream(&key.0, Direction::Down, expected_addr_u32, fcnt32, &mut plaintext);
        (Some(f_port), plaintext)
    } else {
        (None, Vec::new())
    };

    let b0 = b0_block(Direction::Down, expected_addr_u32, fcnt32, body_end as u8);
    let mut mic_input = b0.to_vec();
    mic_input.extend_from_slice(&phy_payload[..body_end]);
    let expected_mic = aes128_cmac(&nwk_skey.0, &mic_input);
    if expected_mic != phy_payload[body_end..] {
        return Err(CodecError::MicError);
    }

    Ok(DecodedDown {
        confirmed,
        fctrl,
        fcnt16,
        fcnt32,
        fopts,
        f_port,
        mac_payload,
    })
}
