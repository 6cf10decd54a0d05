// Raw RSA engine
// Single-block modular exponentiation with no padding scheme. Decryption
// runs through the CRT parameters cached on the private key.

use num_bigint::BigUint;

use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::{Result, RsaError};

/// Encrypt a single block: c = m^e mod n
///
/// The input bytes are interpreted as a big-endian integer m, which must
/// be strictly below the modulus. Returns the big-endian bytes of the
/// ciphertext value.
pub fn encrypt(key: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(RsaError::InvalidInput("empty plaintext block".into()));
    }

    let m = BigUint::from_bytes_be(plaintext);
    if m >= key.n {
        return Err(RsaError::InvalidInput(
            "plaintext value is not below the modulus".into(),
        ));
    }

    let c = m.modpow(&key.e, &key.n);
    Ok(c.to_bytes_be())
}

/// Decrypt a single block via the Chinese Remainder Theorem.
///
/// Splits c^d mod n into two half-size exponentiations modulo p and q and
/// recombines with the cached q^(-1) mod p. Roughly 4x faster than the
/// direct exponentiation for large moduli.
pub fn decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() {
        return Err(RsaError::InvalidInput("empty ciphertext block".into()));
    }

    let c = BigUint::from_bytes_be(ciphertext);
    if c >= key.n {
        return Err(RsaError::InvalidInput(
            "ciphertext value is not below the modulus".into(),
        ));
    }

    Ok(decrypt_crt(&c, key).to_bytes_be())
}

/// CRT recombination: m_p = c^d_p mod p, m_q = c^d_q mod q,
/// h = q_inv * (m_p - m_q) mod p, m = m_q + h * q
fn decrypt_crt(c: &BigUint, key: &RsaPrivateKey) -> BigUint {
    let m_p = c.modpow(&key.d_p, &key.p);
    let m_q = c.modpow(&key.d_q, &key.q);

    // m_p < p and m_q < q < p, so the difference stays within one
    // addition of p
    let diff = if m_p >= m_q {
        m_p - &m_q
    } else {
        m_p + &key.p - &m_q
    };
    let h = (diff * &key.q_inv) % &key.p;

    m_q + &key.q * h
}

/// Reference path without CRT: m = c^d mod n. Kept for cross-checking the
/// optimized decryption.
#[cfg(test)]
fn decrypt_direct(c: &BigUint, key: &RsaPrivateKey) -> BigUint {
    c.modpow(&key.d, &key.n)
}
