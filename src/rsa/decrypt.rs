// RSA Decryption Implementation
// Reverses `encrypt_bytes` with the private exponent

use log::info;

use super::codec::{decode_blocks, decrypt_widths};
use super::error::{RsaError, RsaResult};
use super::keygen::RsaPrivateKey;
use super::padding::strip_terminator;

/// Decrypt ciphertext bytes using RSA private key
/// Returns plaintext as bytes
///
/// The ciphertext must have been produced with the same modulus; block
/// boundaries are implied by its bit length.
pub fn decrypt_bytes(ciphertext: &[u8], private_key: &RsaPrivateKey) -> RsaResult<Vec<u8>> {
    let (read_bits, write_bits) = decrypt_widths(&private_key.n)?;

    let decoded = decode_blocks(ciphertext, read_bits, write_bits, &private_key.d, &private_key.n)?;
    let plaintext = strip_terminator(decoded)?;

    info!(
        "decrypted {} bytes into {} bytes with a {}-bit key",
        ciphertext.len(),
        plaintext.len(),
        private_key.bit_length()
    );

    Ok(plaintext)
}

/// Decrypt ciphertext to a string
pub fn decrypt_to_string(ciphertext: &[u8], private_key: &RsaPrivateKey) -> RsaResult<String> {
    let plaintext = decrypt_bytes(ciphertext, private_key)?;
    String::from_utf8(plaintext).map_err(|_| RsaError::MalformedCiphertext)
}
