//! AES-128 primitives underlying the LoRaWAN frame codec: single-block
//! ECB encryption (used both for the JoinAccept body and for the A_i
//! keystream blocks) and AES-CMAC (used for every MIC and for session-key
//! derivation).

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use cmac::{Cmac, Mac};

/// Encrypts a single 16-byte block under `key` with AES-128 ECB.
///
/// Used directly (not XORed with anything) for the JoinAccept body
/// decryption trick and for each keystream block `S_i = AES_ECB(key, A_i)`.
pub fn aes128_ecb_encrypt_block(key: &[u8; 16], block: &[u8; 16]) -> [u8; 16] {
    let cipher = Aes128::new(GenericArray::from_slice(key));
    let mut buf = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut buf);
    buf.into()
}

/// AES-CMAC over `data` under `key`, keeping only the first 4 bytes as the
/// LoRaWAN MIC.
pub fn aes128_cmac(key: &[u8; 16], data: &[u8]) -> [u8; 4] {
    let mut mac = <Cmac<Aes128> as Mac>::new_from_slice(key).expect("16-byte key");
    mac.update(data);
    let full = mac.finalize().into_bytes();
    let mut mic = [0u8; 4];
    mic.copy_from_slice(&full[0..4]);
    mic
}

/// Direction byte used in the A_i / B_0 block constructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up = 0,
    Down = 1,
}

/// Builds the A_i keystream block for block index `i` (1-based) per
/// LoRaWAN 1.0.2 §4.3.3.1.
fn a_block(dir: Direction, dev_addr: u32, fcnt32: u32, i: u8) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = 0x01;
    // bytes 1..4 reserved, already zero
    block[5] = dir as u8;
    block[6..10].copy_from_slice(&dev_addr.to_le_bytes());
    block[10..14].copy_from_slice(&fcnt32.to_le_bytes());
    // byte 14 reserved (frame counter upper byte for multi-frame, always 0 here)
    block[15] = i;
    block
}

/// Encrypts or decrypts (the cipher is an XOR keystream, so the operation
/// is its own inverse) `data` in place using the A_i block keystream.
pub fn apply_keystream(
    key: &[u8; 16],
    dir: Direction,
    dev_addr: u32,
    fcnt32: u32,
    data: &mut [u8],
) {
    let block_count = data.len().div_ceil(16).max(1);
    for block_idx in 0..block_count {
        let a = a_block(dir, dev_addr, fcnt32, (block_idx + 1) as u8);
        let s = aes128_ecb_encrypt_block(key, &a);
        let start = block_idx * 16;
        let end = (start + 16).min(data.len());
        for (byte, keystream_byte) in data[start..end].iter_mut().zip(s.iter()) {
            *byte ^= keystream_byte;
        }
    }
}

/// Builds the B_0 block used for the data-frame MIC per LoRaWAN 1.0.2
/// §4.4.
pub fn b0_block(dir: Direction, dev_addr: u32, fcnt32: u32, msg_len: u8) -> [u8; 16] {
    let mut block = [0u8; 16];
    block[0] = 0x49;
    // bytes 1..4 reserved, already zero
    block[5] = dir as u8;
    block[6..10].copy_from_slice(&dev_addr.to_le_bytes());
    block[10..14].copy_from_slice(&fcnt32.to_le_bytes());
    // byte 14 reserved
    block[15] = msg_len;
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystream_is_its_own_inverse() {
        let key = [0x11u8; 16];
        let mut data = b"hello lorawan!!!".to_vec();
        let original = data.clone();
        apply_keystream(&key, Direction::Up, 0x2601_1bda, 1, &mut data);
        assert_ne!(data, original);
        apply_keystream(&key, Direction::Up, 0x2601_1bda, 1, &mut data);
        assert_eq!(data, original);
    }

    #[test]
    fn cmac_is_deterministic_and_key_dependent() {
        let key_a = [0x01u8; 16];
        let key_b = [0x02u8; 16];
        let data = b"join request body";
        assert_eq!(aes128_cmac(&key_a, data), aes128_cmac(&key_a, data));
        assert_ne!(aes128_cmac(&key_a, data), aes128_cmac(&key_b, data));
    }
}
