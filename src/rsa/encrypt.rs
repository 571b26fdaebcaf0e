// RSA Encryption Implementation
// Encrypts whole messages block by block under a public key

use log::info;

use super::codec::{encode_blocks, encrypt_widths};
use super::error::RsaResult;
use super::keygen::RsaPublicKey;
use super::padding::append_terminator;

/// Encrypt bytes using RSA public key
/// Returns ciphertext as bytes
///
/// Each `bits(n) - 1` bit slice of the terminated plaintext becomes one
/// `bits(n)` bit ciphertext block. Equal plaintext blocks produce equal
/// ciphertext blocks.
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> RsaResult<Vec<u8>> {
    let (read_bits, write_bits) = encrypt_widths(&public_key.n)?;
    let framed = append_terminator(plaintext);

    let ciphertext = encode_blocks(&framed, read_bits, write_bits, &public_key.e, &public_key.n)?;

    info!(
        "encrypted {} bytes into {} bytes with a {}-bit key",
        plaintext.len(),
        ciphertext.len(),
        public_key.bit_length()
    );

    Ok(ciphertext)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> RsaResult<Vec<u8>> {
    encrypt_bytes(plaintext.as_bytes(), public_key)
}
