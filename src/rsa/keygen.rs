// RSA key pair generation
// Builds public/private key pairs with cached CRT parameters

use num_bigint::BigUint;
use rand::Rng;
use tracing::debug;

use super::bigint::{mod_inverse, random_prime};
use crate::error::{Result, RsaError};

/// Primality error bound exponent: candidates pass Miller-Rabin with an
/// error probability of at most 2^(-DEFAULT_CERTAINTY).
/// See A.15.2 IEEE P1363 v2 D1 for the certainty parameter.
pub const DEFAULT_CERTAINTY: u32 = 2;

/// Whole-pair retry budget. A sampled pair is rejected when p = q or a
/// modular inverse unexpectedly fails to exist.
const MAX_PAIR_ATTEMPTS: u32 = 8;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicKey {
    pub n: BigUint,  // Modulus
    pub e: BigUint,  // Public exponent
}

/// RSA Private Key with cached CRT parameters
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPrivateKey {
    pub n: BigUint,      // Modulus (same as public)
    pub e: BigUint,      // Public exponent
    pub d: BigUint,      // Private exponent
    pub p: BigUint,      // First prime factor
    pub q: BigUint,      // Second prime factor
    // Pre-computed values for faster decryption
    pub d_p: BigUint,    // d mod (p-1)
    pub d_q: BigUint,    // d mod (q-1)
    pub q_inv: BigUint,  // q^(-1) mod p
}

/// RSA Key Pair (both public and private keys)
///
/// Both halves carry the same modulus by construction.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    /// Bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

/// Generate an RSA key pair with the given modulus bit length.
///
/// e: public exponent (common values: 3, 17, 65537); must be odd since
/// p-1 and q-1 are even.
///
/// Primes are sampled at half the modulus bit length and rejected up
/// front unless gcd(e, p-1) = 1, so the private exponent always exists.
/// The pair-level retry loop is bounded; exhausting it returns
/// `RsaError::KeyGeneration`.
pub fn generate_keypair<R: Rng + ?Sized>(
    rng: &mut R,
    bit_length: u64,
    e: u64,
    certainty: u32,
) -> Result<RsaKeyPair> {
    if bit_length < 16 || bit_length % 2 != 0 {
        return Err(RsaError::InvalidInput(format!(
            "modulus bit length must be even and at least 16, got {}",
            bit_length
        )));
    }
    if e < 3 || e % 2 == 0 {
        return Err(RsaError::InvalidInput(format!(
            "public exponent must be odd and at least 3, got {}",
            e
        )));
    }

    let e = BigUint::from(e);
    let half_bits = bit_length / 2;

    for attempt in 1..=MAX_PAIR_ATTEMPTS {
        // Step 1: sample two probable primes of half the target bit length
        let p = random_prime(rng, half_bits, &e, certainty)?;
        let q = random_prime(rng, half_bits, &e, certainty)?;

        if p == q {
            continue;
        }

        // Keep p > q so the CRT recombination only subtracts within p
        let (p, q) = if p < q { (q, p) } else { (p, q) };

        // Step 2: n = p * q and φ(n) = (p-1)(q-1)
        let n = &p * &q;
        let p_minus_1 = &p - 1u8;
        let q_minus_1 = &q - 1u8;
        let phi = &p_minus_1 * &q_minus_1;

        // Step 3: d = e^(-1) mod φ(n). Guaranteed by the coprimality
        // filter in prime sampling; a miss means the pair is unusable
        // and is resampled.
        let d = match mod_inverse(&e, &phi) {
            Some(d) => d,
            None => continue,
        };

        // Step 4: CRT parameters
        let d_p = &d % &p_minus_1;
        let d_q = &d % &q_minus_1;
        let q_inv = match mod_inverse(&q, &p) {
            Some(inv) => inv,
            None => continue,
        };

        debug!(bit_length, attempt, "generated RSA key pair");

        return Ok(RsaKeyPair {
            public_key: RsaPublicKey {
                n: n.clone(),
                e: e.clone(),
            },
            private_key: RsaPrivateKey {
                n,
                e,
                d,
                p,
                q,
                d_p,
                d_q,
                q_inv,
            },
        });
    }

    Err(RsaError::KeyGeneration {
        attempts: MAX_PAIR_ATTEMPTS as u64,
    })
}
