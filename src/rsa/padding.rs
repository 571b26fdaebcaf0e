// Message terminator
// Ciphertext carries no length, so the plaintext is closed with a marker byte
// and decoding drops the zero fill that follows it.
//
// Format: data || 0x80 || 0x00*

use super::error::{RsaError, RsaResult};

pub const TERMINATOR: u8 = 0x80;

/// Copy `data` and close it with the terminator byte
pub fn append_terminator(data: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(data.len() + 1);
    framed.extend_from_slice(data);
    framed.push(TERMINATOR);
    framed
}

/// Remove trailing zero bytes and the terminator in front of them
pub fn strip_terminator(mut data: Vec<u8>) -> RsaResult<Vec<u8>> {
    while data.last() == Some(&0) {
        data.pop();
    }

    match data.pop() {
        Some(TERMINATOR) => Ok(data),
        _ => Err(RsaError::MalformedCiphertext),
    }
}
