// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod codec;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod keygen;
pub mod padding;
pub mod prime;

pub use bigint::{extended_gcd, mod_inverse, mod_pow, RsaBigInt};
pub use codec::{decode_blocks, encode_blocks, Block, Blocks};
pub use decrypt::{decrypt_bytes, decrypt_to_string};
pub use encrypt::{encrypt_bytes, encrypt_string};
pub use error::{RsaError, RsaResult};
pub use keygen::{
    generate_default_keypair, generate_keypair, keypair_from_primes, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};
pub use prime::{is_probable_prime, random_prime, KEY_ROUNDS};
