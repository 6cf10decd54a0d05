// Key transformation
// Derives a key pair over the same modulus whose public exponent is the
// original exponent multiplied by the modulus itself. The private
// exponent and per-prime CRT exponents are recomputed to match.

use tracing::debug;

use super::bigint::mod_inverse;
use super::keygen::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
use crate::error::{Result, RsaError};

/// Build a new key pair with the inflated exponent e' = e * n.
///
/// The primes, modulus, and q^(-1) mod p carry over unchanged; d, d_p and
/// d_q are rederived for the new exponent. The input key is not modified.
///
/// The original exponent was only checked for coprimality with φ(n), not
/// e * n, so invertibility is verified here: if gcd(n, φ(n)) != 1 the
/// inflated exponent has no inverse and the transformation fails with
/// `RsaError::ModularInverse`.
pub fn inflate_exponent(key: &RsaPrivateKey) -> Result<RsaKeyPair> {
    let phi = (&key.p - 1u8) * (&key.q - 1u8);
    let e = &key.e * &key.n;

    let d = mod_inverse(&e, &phi).ok_or_else(|| {
        RsaError::ModularInverse("inflated exponent e*n shares a factor with the totient".into())
    })?;

    let d_p = &d % (&key.p - 1u8);
    let d_q = &d % (&key.q - 1u8);

    debug!(exponent_bits = e.bits(), "inflated public exponent");

    Ok(RsaKeyPair {
        public_key: RsaPublicKey {
            n: key.n.clone(),
            e: e.clone(),
        },
        private_key: RsaPrivateKey {
            n: key.n.clone(),
            e,
            d,
            p: key.p.clone(),
            q: key.q.clone(),
            d_p,
            d_q,
            q_inv: key.q_inv.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::engine::{decrypt, encrypt};
    use crate::rsa::keygen::generate_keypair;
    use crate::rsa::sample::sample_plaintext;
    use num_bigint::BigUint;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_inflated_exponent_value() {
        let mut rng = StdRng::seed_from_u64(30);
        let pair = generate_keypair(&mut rng, 256, 65537, 20).unwrap();

        let inflated = inflate_exponent(&pair.private_key).unwrap();
        assert_eq!(
            inflated.public_key.e,
            &pair.public_key.e * &pair.public_key.n
        );
        assert_eq!(inflated.public_key.n, pair.public_key.n);
    }

    #[test]
    fn test_inflated_key_invariants() {
        let mut rng = StdRng::seed_from_u64(31);
        let pair = generate_keypair(&mut rng, 256, 3, 20).unwrap();

        let inflated = inflate_exponent(&pair.private_key).unwrap();
        let key = &inflated.private_key;

        let phi = (&key.p - 1u8) * (&key.q - 1u8);
        assert_eq!((&key.e * &key.d) % &phi, BigUint::one());
        assert_eq!(key.d_p, &key.d % (&key.p - 1u8));
        assert_eq!(key.d_q, &key.d % (&key.q - 1u8));
        assert_eq!(key.q_inv, pair.private_key.q_inv);
    }

    #[test]
    fn test_input_key_untouched() {
        let mut rng = StdRng::seed_from_u64(32);
        let pair = generate_keypair(&mut rng, 256, 65537, 20).unwrap();
        let before = pair.private_key.clone();

        inflate_exponent(&pair.private_key).unwrap();
        assert_eq!(pair.private_key, before);
    }

    #[test]
    fn test_roundtrip_with_inflated_key() {
        let mut rng = StdRng::seed_from_u64(33);

        for e in [3u64, 65537] {
            let pair = generate_keypair(&mut rng, 512, e, 20).unwrap();
            let inflated = inflate_exponent(&pair.private_key).unwrap();
            let plaintext = sample_plaintext(&mut rng, &inflated.public_key).unwrap();

            let ciphertext = encrypt(&inflated.public_key, &plaintext).unwrap();
            let decrypted = decrypt(&inflated.private_key, &ciphertext).unwrap();

            assert_eq!(
                BigUint::from_bytes_be(&decrypted),
                BigUint::from_bytes_be(&plaintext)
            );
        }
    }
}
