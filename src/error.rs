// Error types shared by the RSA primitives and the benchmark harness

use thiserror::Error;

/// Errors surfaced by key generation, the raw RSA engine, and the
/// benchmark harness.
///
/// None of these are recoverable mid-run: a wrong or unverifiable key must
/// never contribute to a timing average, so every variant aborts the
/// current trial and propagates to the caller.
#[derive(Debug, Error)]
pub enum RsaError {
    /// Malformed caller input (empty block, value not below the modulus,
    /// zero iteration count, unusable public exponent).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No multiplicative inverse exists for the exponent modulo the totient.
    #[error("no modular inverse: {0}")]
    ModularInverse(String),

    /// An encrypt/decrypt round trip did not reproduce the plaintext.
    /// Indicates an arithmetic defect, not a transient condition.
    #[error("round-trip validation failed: decrypted block does not match the sampled plaintext")]
    Validation,

    /// The prime-sampling retry budget was exhausted.
    #[error("prime generation gave up after {attempts} attempts")]
    KeyGeneration { attempts: u64 },

    /// The plaintext rejection-sampling budget was exhausted.
    #[error("plaintext sampling gave up after {attempts} attempts")]
    SamplingExhausted { attempts: u32 },
}

/// Result type for RSA and benchmark operations.
pub type Result<T> = std::result::Result<T, RsaError>;
