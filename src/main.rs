use anyhow::Result;
use clap::Parser;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use rsa_bench::bench::{run_exponent, BenchConfig, ExponentReport};

/// Public exponents under test; each is benchmarked as-is and after
/// inflation by the modulus.
const EXPONENTS: [u64; 2] = [3, 65537];

#[derive(Parser, Debug)]
#[command(
    name = "rsa-bench",
    about = "Benchmark raw RSA with normal and modulus-inflated public exponents"
)]
struct Args {
    /// Independent key pairs per exponent
    #[arg(long, default_value_t = 10)]
    keys: usize,
    /// Timed operations per key
    #[arg(long, default_value_t = 100)]
    ops: u32,
    /// Modulus size in bits
    #[arg(long, default_value_t = 2048)]
    bits: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut rng = thread_rng();

    for exponent in EXPONENTS {
        let config = BenchConfig {
            exponent,
            bit_length: args.bits,
            key_count: args.keys,
            ops_per_key: args.ops,
        };
        let report = run_exponent(&mut rng, &config)?;
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ExponentReport) {
    let e = report.exponent;
    println!(
        "original RSA    | encryption | e = {} | {} seconds",
        e, report.original.encrypt_avg_secs
    );
    println!(
        "original RSA    | decryption | e = {} | {} seconds",
        e, report.original.decrypt_avg_secs
    );
    println!(
        "transformed RSA | encryption | e = {} | {} seconds",
        e, report.transformed.encrypt_avg_secs
    );
    println!(
        "transformed RSA | decryption | e = {} | {} seconds",
        e, report.transformed.decrypt_avg_secs
    );
}
