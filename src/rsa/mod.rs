// RSA primitives - main module file
// Exports key generation, the raw engine, and the supporting utilities

pub mod bigint;
pub mod encoding;
pub mod engine;
pub mod keygen;
pub mod sample;
pub mod transform;

pub use encoding::public_key_to_der;
pub use engine::{decrypt, encrypt};
pub use keygen::{generate_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey, DEFAULT_CERTAINTY};
pub use sample::sample_plaintext;
pub use transform::inflate_exponent;
