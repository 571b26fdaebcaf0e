// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use super::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// Runs the usual remainder sequence iteratively, so the depth does not grow
/// with the size of the inputs. `extended_gcd(a, 0)` is `(a, 1, 0)`.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (BigInt, BigInt, BigInt) {
    let mut old_r = BigInt::from_biguint(Sign::Plus, a.clone());
    let mut r = BigInt::from_biguint(Sign::Plus, b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if m.is_zero() {
        return Err(RsaError::NoModularInverse);
    }

    let (gcd, x, _) = extended_gcd(a, m);
    if !gcd.is_one() {
        return Err(RsaError::NoModularInverse);
    }

    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    // mod_floor keeps the sign of the divisor, so the result is never negative
    x.mod_floor(&m)
        .to_biguint()
        .ok_or(RsaError::NoModularInverse)
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::RandBigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bezout_holds(a: u64, b: u64) {
        let (g, x, y) = extended_gcd(&from_u64(a), &from_u64(b));
        assert_eq!(g, BigInt::from(a) * &x + BigInt::from(b) * &y, "a={a} b={b}");
        assert_eq!(g, BigInt::from(from_u64(a).gcd(&from_u64(b))));
    }

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_pow_textbook_rsa() {
        let n = from_u64(3233);
        let c = mod_pow(&from_u64(65), &from_u64(17), &n);
        assert_eq!(c, from_u64(2790));
        assert_eq!(mod_pow(&c, &from_u64(2753), &n), from_u64(65));
    }

    #[test]
    fn test_mod_pow_edges() {
        assert_eq!(mod_pow(&from_u64(12), &from_u64(34), &from_u64(1)), from_u64(0));
        assert_eq!(mod_pow(&from_u64(12), &from_u64(0), &from_u64(5)), from_u64(1));
        assert_eq!(mod_pow(&from_u64(0), &from_u64(9), &from_u64(5)), from_u64(0));
    }

    #[test]
    fn test_mod_pow_matches_num_bigint() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let modulus = rng.gen_biguint(256) | from_u64(1);
            let base = rng.gen_biguint(300);
            let exp = rng.gen_biguint(128);
            assert_eq!(mod_pow(&base, &exp, &modulus), base.modpow(&exp, &modulus));
        }
    }

    #[test]
    fn test_extended_gcd() {
        bezout_holds(240, 46);
        bezout_holds(46, 240);
        bezout_holds(17, 3120);
        bezout_holds(0, 5);
        bezout_holds(5, 0);
        bezout_holds(1, 1);
        bezout_holds(2u64.pow(61) - 1, 2u64.pow(31) - 1);

        let (g, x, y) = extended_gcd(&from_u64(9), &from_u64(0));
        assert_eq!((g, x, y), (BigInt::from(9), BigInt::one(), BigInt::zero()));
    }

    #[test]
    fn test_extended_gcd_random_pairs() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let a = rng.gen_biguint(512);
            let b = rng.gen_biguint(384);
            let (g, x, y) = extended_gcd(&a, &b);
            let ai = BigInt::from(a.clone());
            let bi = BigInt::from(b.clone());
            assert_eq!(g, ai * x + bi * y);
            assert_eq!(g, BigInt::from(gcd(&a, &b)));
        }
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));

        // Verify: 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((a * inv) % m, from_u64(1));

        assert_eq!(mod_inverse(&from_u64(17), &from_u64(3120)).unwrap(), from_u64(2753));
    }

    #[test]
    fn test_mod_inverse_missing() {
        assert_eq!(mod_inverse(&from_u64(6), &from_u64(9)), Err(RsaError::NoModularInverse));
        assert_eq!(mod_inverse(&from_u64(3), &from_u64(0)), Err(RsaError::NoModularInverse));
    }
}
