// Prime testing and generation
// Miller-Rabin probabilistic test and the candidate search built on it

use log::{debug, trace};
use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use super::bigint::{mod_pow, RsaBigInt};
use super::error::{RsaError, RsaResult};

/// Miller-Rabin rounds used for key material
pub const KEY_ROUNDS: u32 = 20;

/// Miller-Rabin primality test
/// Returns true if n is probably prime, with a false positive probability of
/// at most 4^(-rounds). Values up to 3 are accepted as-is, `rounds` of zero is
/// treated as one round.
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    if n <= &RsaBigInt::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^k with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut k = 0u32;
    while d.is_even() {
        d >>= 1;
        k += 1;
    }

    let two = RsaBigInt::from(2u8);

    for _ in 0..rounds.max(1) {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut passed = false;
        for _ in 1..k {
            x = (&x * &x) % n;
            if x == n_minus_one {
                passed = true;
                break;
            }
            if x.is_one() {
                // non-trivial square root of 1
                return false;
            }
        }

        if !passed {
            return false;
        }
    }

    true
}

/// Generate a random probable prime of exactly `bit_length` bits
///
/// The search starts at a uniform odd value in [2^(B-1), 2^B - 1] and walks
/// upward in steps of two, wrapping back to the bottom of the range so the
/// result always keeps its top bit.
pub fn random_prime<R: Rng + ?Sized>(bit_length: u64, rounds: u32, rng: &mut R) -> RsaResult<RsaBigInt> {
    if bit_length < 2 {
        return Err(RsaError::InvalidBitWidth(bit_length as usize));
    }

    let lower = RsaBigInt::one() << (bit_length - 1);
    let upper = RsaBigInt::one() << bit_length;

    let mut candidate = rng.gen_biguint_range(&lower, &upper) | RsaBigInt::one();
    let mut tried = 1u64;

    loop {
        if is_probable_prime(&candidate, rounds, rng) {
            debug!("found {}-bit prime after {} candidates", bit_length, tried);
            return Ok(candidate);
        }
        trace!("rejected candidate {}", candidate);

        candidate += 2u8;
        if candidate >= upper {
            candidate = &lower + 1u8;
        }
        tried += 1;
    }
}
