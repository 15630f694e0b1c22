//! Exhaustive verification of the cumulative index against a brute-force oracle.
//!
//! Checks every power-of-two size up to `2^max_bits` and exits non-zero on the
//! first disagreement.

use anyhow::{Context, Result};
use clap::Parser;
use fenwick_index::verify::{self, Harness};
use std::io::{self, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fenwick_verify")]
#[command(about = "Cross-check the cumulative index against a brute-force oracle", long_about = None)]
struct Cli {
    /// Largest exponent: sizes 2^1 ..= 2^max_bits are checked
    #[arg(long, default_value_t = verify::DEFAULT_MAX_BITS)]
    max_bits: u32,

    /// Print per-position diagnostics
    #[arg(long, default_value_t = false)]
    verbose: bool,

    /// Also dump the n = 4 tree verbosely after the sweep
    #[arg(long, default_value_t = false)]
    show_small: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let harness = Harness {
        max_bits: cli.max_bits,
        verbose: cli.verbose,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let start = Instant::now();
    let summary = harness
        .run(&mut out)
        .with_context(|| format!("verification failed (max bits {})", cli.max_bits))?;

    if cli.show_small {
        let weights: Vec<u64> = (1..=4).collect();
        verify::check(&weights, true, &mut out).context("n = 4 dump failed")?;
    }

    writeln!(
        out,
        "ok: {} trees, {} queries, {} lookups in {:.2?}",
        summary.trees(),
        summary.queries(),
        summary.lookups(),
        start.elapsed()
    )?;
    Ok(())
}
