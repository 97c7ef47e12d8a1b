//! Bench Command
//!
//! Quick single-thread and batch throughput against SHA-256 and plain SM3.
//! For rigorous numbers use the criterion suite in `benches/`.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

use anyhow::Result;
use funnelhash::{Config, FunnelContext, MESSAGE_SIZE};
use sha2::{Digest as _, Sha256};
use std::hint::black_box;
use std::time::{Duration, Instant};

fn throughput(bytes: usize, elapsed: Duration) -> f64 {
    bytes as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / (1024.0 * 1024.0)
}

fn report(name: &str, bytes: usize, elapsed: Duration) {
    println!(
        "{name:<28} {:>10.1} MiB/s  ({:.3?})",
        throughput(bytes, elapsed),
        elapsed
    );
}

/// Run each contender over the same `pages` pseudo-random pages.
pub fn bench(ctx: &FunnelContext, config: &Config, pages: usize, threads: usize) -> Result<()> {
    let pages = pages.max(1);
    let data: Vec<u8> = (0..pages * MESSAGE_SIZE)
        .map(|i| (i.wrapping_mul(0x9E37_79B9) >> 7) as u8)
        .collect();
    let bytes = data.len();

    println!("Backend: {}", ctx.backend_name());
    println!("Config:  ratio {} / {} / {} bits", config.ratio.get(), config.mix, config.width.bits());
    println!("Input:   {pages} pages ({} KiB)\n", bytes / 1024);

    let start = Instant::now();
    for page in data.chunks_exact(MESSAGE_SIZE) {
        black_box(funnelhash::digest_with(ctx, config, page)?);
    }
    report("funnelhash (1 thread)", bytes, start.elapsed());

    let start = Instant::now();
    black_box(funnelhash::dispatch(ctx, config, &data, threads)?);
    report(&format!("funnelhash ({threads} threads)"), bytes, start.elapsed());

    let start = Instant::now();
    for page in data.chunks_exact(MESSAGE_SIZE) {
        black_box(funnelhash::plain256(page)?);
    }
    report("plain SM3", bytes, start.elapsed());

    let start = Instant::now();
    for page in data.chunks_exact(MESSAGE_SIZE) {
        black_box(Sha256::digest(page));
    }
    report("SHA-256", bytes, start.elapsed());

    Ok(())
}
