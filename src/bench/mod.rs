// Benchmark module - main module file
// Exports the trial harness and its timing aggregates

pub mod harness;

pub use harness::{run_exponent, BenchConfig, ExponentReport, TimingSample, VariantTiming};
