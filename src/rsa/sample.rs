// Plaintext sampling
// Rejection-samples a random byte string whose integer value fits under
// the modulus, so it is usable as a raw RSA input block.

use num_bigint::BigUint;
use rand::Rng;

use super::keygen::RsaPublicKey;
use crate::error::{Result, RsaError};

/// Draw budget. Each draw lands below the modulus with probability
/// roughly 1/2 (the sample space is the power of two just above n), so
/// the budget is effectively never reached.
const MAX_SAMPLE_ATTEMPTS: u32 = 128;

/// Sample a uniformly random plaintext block strictly below the modulus.
///
/// The block is bits(n)/8 bytes long and is returned exactly as drawn;
/// leading zero bytes are preserved rather than re-encoded, so every
/// sample for a given key has the same length.
pub fn sample_plaintext<R: Rng + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
) -> Result<Vec<u8>> {
    let len = (key.n.bits() / 8) as usize;
    if len == 0 {
        return Err(RsaError::InvalidInput(
            "modulus is too small to carry a plaintext byte".into(),
        ));
    }

    let mut bytes = vec![0u8; len];
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        rng.fill_bytes(&mut bytes);

        if BigUint::from_bytes_be(&bytes) < key.n {
            return Ok(bytes);
        }
    }

    Err(RsaError::SamplingExhausted {
        attempts: MAX_SAMPLE_ATTEMPTS,
    })
}
