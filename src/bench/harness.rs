// Benchmark harness
// Runs independent (key, plaintext) trials for one public exponent,
// validates each round trip, and times repeated encrypt/decrypt batches
// for both the original keys and their exponent-inflated variants.

use std::hint::black_box;
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{Result, RsaError};
use crate::rsa::{
    engine, generate_keypair, inflate_exponent, sample_plaintext, RsaKeyPair, DEFAULT_CERTAINTY,
};

/// Parameters for one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Public exponent used for key generation.
    pub exponent: u64,
    /// Modulus size in bits.
    pub bit_length: u64,
    /// Number of independent key pairs, each with its own plaintext.
    pub key_count: usize,
    /// Timed operations per key; the reported times are per operation.
    pub ops_per_key: u32,
}

/// Elapsed wall-clock time for one batch of identical operations.
#[derive(Debug, Clone, Copy)]
pub struct TimingSample {
    pub elapsed: Duration,
    pub iterations: u32,
}

impl TimingSample {
    /// Seconds per single operation.
    pub fn per_op_secs(&self) -> f64 {
        self.elapsed.as_secs_f64() / self.iterations as f64
    }
}

/// Per-operation averages across all keys of one key variant.
#[derive(Debug, Clone, Copy)]
pub struct VariantTiming {
    pub encrypt_avg_secs: f64,
    pub decrypt_avg_secs: f64,
}

/// Aggregated result of one run: averages for the freshly generated keys
/// and for the same keys after exponent inflation.
#[derive(Debug, Clone)]
pub struct ExponentReport {
    pub exponent: u64,
    pub original: VariantTiming,
    pub transformed: VariantTiming,
}

/// Run the full benchmark for one public exponent.
///
/// Every key is validated with an untimed round trip before its timed
/// batches; a mismatch aborts the run, since a defective primitive must
/// never contribute to the averages. The original key pairs are left
/// untouched by the transformation phase.
pub fn run_exponent<R: Rng + ?Sized>(rng: &mut R, config: &BenchConfig) -> Result<ExponentReport> {
    if config.key_count == 0 {
        return Err(RsaError::InvalidInput("key_count must be at least 1".into()));
    }
    if config.ops_per_key == 0 {
        return Err(RsaError::InvalidInput("ops_per_key must be at least 1".into()));
    }

    info!(
        exponent = config.exponent,
        keys = config.key_count,
        ops = config.ops_per_key,
        "generating key pairs"
    );

    let mut keys = Vec::with_capacity(config.key_count);
    for _ in 0..config.key_count {
        keys.push(generate_keypair(
            rng,
            config.bit_length,
            config.exponent,
            DEFAULT_CERTAINTY,
        )?);
    }

    let mut plaintexts = Vec::with_capacity(config.key_count);
    for key in &keys {
        plaintexts.push(sample_plaintext(rng, &key.public_key)?);
    }

    info!(exponent = config.exponent, "timing original keys");
    let original = measure_variant(&keys, &plaintexts, config.ops_per_key)?;

    // Same primes and plaintexts, inflated exponent
    let inflated: Vec<RsaKeyPair> = keys
        .iter()
        .map(|pair| inflate_exponent(&pair.private_key))
        .collect::<Result<_>>()?;

    info!(exponent = config.exponent, "timing transformed keys");
    let transformed = measure_variant(&inflated, &plaintexts, config.ops_per_key)?;

    Ok(ExponentReport {
        exponent: config.exponent,
        original,
        transformed,
    })
}

/// Validate and time every (key, plaintext) pair, then average the
/// per-operation times across keys.
fn measure_variant(
    keys: &[RsaKeyPair],
    plaintexts: &[Vec<u8>],
    ops_per_key: u32,
) -> Result<VariantTiming> {
    let mut encrypt_total = 0.0;
    let mut decrypt_total = 0.0;

    for (index, (pair, plaintext)) in keys.iter().zip(plaintexts).enumerate() {
        let (enc, dec) = time_key(pair, plaintext, ops_per_key)?;
        debug!(
            key = index,
            encrypt_secs = enc.per_op_secs(),
            decrypt_secs = dec.per_op_secs(),
            "timed key"
        );
        encrypt_total += enc.per_op_secs();
        decrypt_total += dec.per_op_secs();
    }

    Ok(VariantTiming {
        encrypt_avg_secs: encrypt_total / keys.len() as f64,
        decrypt_avg_secs: decrypt_total / keys.len() as f64,
    })
}

/// Round-trip check followed by the two timed batches for a single key.
fn time_key(
    pair: &RsaKeyPair,
    plaintext: &[u8],
    ops_per_key: u32,
) -> Result<(TimingSample, TimingSample)> {
    let ciphertext = engine::encrypt(&pair.public_key, plaintext)?;
    let decrypted = engine::decrypt(&pair.private_key, &ciphertext)?;

    // Values are compared as integers; leading zero bytes of the sampled
    // block do not survive the round trip
    if BigUint::from_bytes_be(&decrypted) != BigUint::from_bytes_be(plaintext) {
        return Err(RsaError::Validation);
    }

    let start = Instant::now();
    for _ in 0..ops_per_key {
        black_box(engine::encrypt(&pair.public_key, black_box(plaintext))?);
    }
    let encrypt_sample = TimingSample {
        elapsed: start.elapsed(),
        iterations: ops_per_key,
    };

    let start = Instant::now();
    for _ in 0..ops_per_key {
        black_box(engine::decrypt(&pair.private_key, black_box(&ciphertext))?);
    }
    let decrypt_sample = TimingSample {
        elapsed: start.elapsed(),
        iterations: ops_per_key,
    };

    Ok((encrypt_sample, decrypt_sample))
}
