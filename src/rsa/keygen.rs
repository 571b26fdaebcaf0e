// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use log::info;
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bigint::{gcd, mod_inverse, RsaBigInt};
use super::error::{RsaError, RsaResult};
use super::prime::{random_prime, KEY_ROUNDS};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    #[serde(with = "decimal")]
    pub n: RsaBigInt, // Modulus
    #[serde(with = "decimal")]
    pub e: RsaBigInt, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateKey {
    #[serde(with = "decimal")]
    pub n: RsaBigInt, // Modulus (same as public)
    #[serde(with = "decimal")]
    pub d: RsaBigInt, // Private exponent
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    /// Bit width each prime was drawn with
    pub bit_length: u64,
}

// Key fields travel as decimal strings so any integer size survives JSON.
mod decimal {
    use num_bigint::BigUint;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigUint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BigUint, D::Error> {
        let text = String::deserialize(d)?;
        let digits = text.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(D::Error::custom(format!("`{}` is not a decimal integer", text)));
        }
        BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| D::Error::custom(format!("`{}` is not a decimal integer", text)))
    }
}

fn check_modulus(n: &RsaBigInt) -> RsaResult<()> {
    if n.bits() < 2 {
        return Err(RsaError::MalformedKey(format!("modulus {} is too small", n)));
    }
    Ok(())
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> usize {
        self.n.bits() as usize
    }

    /// Parse `{"n": "...", "e": "..."}`
    pub fn from_json(text: &str) -> RsaResult<Self> {
        let key: Self =
            serde_json::from_str(text).map_err(|e| RsaError::MalformedKey(e.to_string()))?;
        check_modulus(&key.n)?;
        Ok(key)
    }

    pub fn to_json(&self) -> RsaResult<String> {
        serde_json::to_string(self).map_err(|e| RsaError::MalformedKey(e.to_string()))
    }

    /// Encrypt a message using this public key
    /// Returns ciphertext as bytes
    pub fn encrypt(&self, plaintext: &[u8]) -> RsaResult<Vec<u8>> {
        super::encrypt::encrypt_bytes(plaintext, self)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> usize {
        self.n.bits() as usize
    }

    /// Parse `{"n": "...", "d": "..."}`
    pub fn from_json(text: &str) -> RsaResult<Self> {
        let key: Self =
            serde_json::from_str(text).map_err(|e| RsaError::MalformedKey(e.to_string()))?;
        check_modulus(&key.n)?;
        Ok(key)
    }

    pub fn to_json(&self) -> RsaResult<String> {
        serde_json::to_string(self).map_err(|e| RsaError::MalformedKey(e.to_string()))
    }

    /// Decrypt a ciphertext using this private key
    /// Returns plaintext as bytes
    pub fn decrypt(&self, ciphertext: &[u8]) -> RsaResult<Vec<u8>> {
        super::decrypt::decrypt_bytes(ciphertext, self)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> usize {
        self.public_key.bit_length()
    }
}

/// Generate an RSA key pair from two primes of `bit_length` bits each
///
/// Fails with `InvalidKeyMaterial` when both draws land on the same prime;
/// the caller decides whether to retry.
pub fn generate_keypair<R: Rng + ?Sized>(
    bit_length: u64,
    rounds: u32,
    rng: &mut R,
) -> RsaResult<RsaKeyPair> {
    // Step 1: Generate two random primes p and q
    let p = random_prime(bit_length, rounds, rng)?;
    let q = random_prime(bit_length, rounds, rng)?;

    let mut keypair = keypair_from_primes(&p, &q, rng)?;
    keypair.bit_length = bit_length;
    Ok(keypair)
}

/// Generate a key pair with the thread-local generator and 20 Miller-Rabin rounds
pub fn generate_default_keypair(bit_length: u64) -> RsaResult<RsaKeyPair> {
    generate_keypair(bit_length, KEY_ROUNDS, &mut rand::thread_rng())
}

/// Derive a key pair from the primes `p` and `q`
pub fn keypair_from_primes<R: Rng + ?Sized>(
    p: &RsaBigInt,
    q: &RsaBigInt,
    rng: &mut R,
) -> RsaResult<RsaKeyPair> {
    if p == q {
        return Err(RsaError::InvalidKeyMaterial);
    }

    // Step 2: Compute n = p * q
    let n = p * q;

    // Step 3: Compute φ(n) = (p-1)(q-1)
    let phi_n = (p - 1u8) * (q - 1u8);
    if phi_n < RsaBigInt::from(4u8) {
        return Err(RsaError::InvalidKeyMaterial);
    }

    // Step 4: Pick an odd e in [2, φ(n)) coprime with φ(n)
    let two = RsaBigInt::from(2u8);
    let e = loop {
        let e = rng.gen_biguint_range(&two, &phi_n);
        if e.is_odd() && gcd(&e, &phi_n).is_one() {
            break e;
        }
    };

    // Step 5: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi_n)?;

    let public_key = RsaPublicKey { n: n.clone(), e };
    let private_key = RsaPrivateKey { n, d };

    info!("generated {}-bit RSA modulus", public_key.bit_length());

    Ok(RsaKeyPair {
        public_key,
        private_key,
        bit_length: p.bits().max(q.bits()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::{from_u64, mod_pow};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_key_generation() {
        let mut rng = StdRng::seed_from_u64(42);
        let keypair = generate_keypair(64, KEY_ROUNDS, &mut rng).unwrap();

        assert_eq!(keypair.bit_length, 64);
        assert!(keypair.bit_length() == 127 || keypair.bit_length() == 128);
        assert_eq!(keypair.public_key.n, keypair.private_key.n);
        assert!(keypair.public_key.e > from_u64(1));
        assert!(keypair.public_key.e.is_odd());
        assert!(keypair.private_key.d > from_u64(0));
    }

    #[test]
    fn test_key_properties() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = from_u64(61);
        let q = from_u64(53);
        let keypair = keypair_from_primes(&p, &q, &mut rng).unwrap();

        // Verify n = p * q
        assert_eq!(keypair.public_key.n, from_u64(3233));

        // Verify e * d ≡ 1 (mod φ(n))
        let phi_n = from_u64(3120);
        assert!(gcd(&keypair.public_key.e, &phi_n).is_one());
        assert!(keypair.public_key.e < phi_n);
        let product = &keypair.public_key.e * &keypair.private_key.d;
        assert_eq!(product % &phi_n, from_u64(1));
        assert!(keypair.private_key.d < phi_n);
    }

    #[test]
    fn test_equal_primes_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let p = from_u64(251);
        let result = keypair_from_primes(&p, &p.clone(), &mut rng);
        assert_eq!(result.unwrap_err(), RsaError::InvalidKeyMaterial);
    }

    #[test]
    fn test_degenerate_totient_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = keypair_from_primes(&from_u64(2), &from_u64(3), &mut rng);
        assert_eq!(result.unwrap_err(), RsaError::InvalidKeyMaterial);
    }

    #[test]
    fn test_exponents_invert() {
        let mut rng = StdRng::seed_from_u64(4);
        for bits in [8u64, 16, 48] {
            let keypair = loop {
                match generate_keypair(bits, KEY_ROUNDS, &mut rng) {
                    Ok(keypair) => break keypair,
                    Err(RsaError::InvalidKeyMaterial) => continue,
                    Err(e) => panic!("{e}"),
                }
            };
            let n = &keypair.public_key.n;
            let e = &keypair.public_key.e;
            let d = &keypair.private_key.d;

            let mut samples = vec![from_u64(0), from_u64(1), n - 1u8];
            samples.extend((0..16).map(|_| rng.gen_biguint_below(n)));

            for m in samples {
                let c = mod_pow(&m, e, n);
                assert_eq!(mod_pow(&c, d, n), m, "bits={bits}");
            }
        }
    }

    #[test]
    fn test_json_round_trip() {
        let public_key = RsaPublicKey { n: from_u64(3233), e: from_u64(17) };
        let private_key = RsaPrivateKey { n: from_u64(3233), d: from_u64(2753) };

        let text = public_key.to_json().unwrap();
        assert_eq!(text, r#"{"n":"3233","e":"17"}"#);
        assert_eq!(RsaPublicKey::from_json(&text).unwrap(), public_key);

        let text = private_key.to_json().unwrap();
        assert_eq!(text, r#"{"n":"3233","d":"2753"}"#);
        assert_eq!(RsaPrivateKey::from_json(&text).unwrap(), private_key);
    }

    #[test]
    fn test_json_large_values() {
        let text = r#"{"n": "340282366920938463463374607431768211457", "e": "65537"}"#;
        let key = RsaPublicKey::from_json(text).unwrap();
        assert_eq!(key.bit_length(), 129);
    }

    #[test]
    fn test_malformed_keys() {
        let cases = [
            r#"{"n":"3233"}"#,
            r#"{"n":"32x3","e":"17"}"#,
            r#"{"n":"-3233","e":"17"}"#,
            r#"{"n":"","e":"17"}"#,
            r#"{"n":3233,"e":"17"}"#,
            r#"{"n":"1","e":"17"}"#,
            "not json",
        ];
        for text in cases {
            assert!(
                matches!(RsaPublicKey::from_json(text), Err(RsaError::MalformedKey(_))),
                "{text}"
            );
        }
        assert!(matches!(
            RsaPrivateKey::from_json(r#"{"n":"3233","e":"17"}"#),
            Err(RsaError::MalformedKey(_))
        ));
    }
}
