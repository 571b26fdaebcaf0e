// RSA Errors
// Every failure the core can report to its caller

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsaError {
    /// The two primes drawn for a key pair were equal. The caller should
    /// retry with fresh randomness.
    #[error("Invalid key material: p and q must be different primes")]
    InvalidKeyMaterial,

    #[error("No modular inverse: the exponent is not coprime with the modulus")]
    NoModularInverse,

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// A transformed block does not fit into the configured write width.
    #[error("Block width mismatch: block needs {bits} bits but the write width is {width}")]
    BlockWidthMismatch { bits: u64, width: usize },

    #[error("Invalid bit width `{0}`")]
    InvalidBitWidth(usize),

    #[error("Malformed ciphertext: message terminator not found")]
    MalformedCiphertext,
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
