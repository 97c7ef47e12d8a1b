//! Funnelhash Criterion Benchmark
//!
//! Single-page latency against the comparators, the cost of each funnel
//! configuration, and batch scaling of the dispatcher.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use funnelhash::{Config, DispatchOptions, FunnelContext, MixStrategy, MESSAGE_SIZE};
use rand::prelude::*;
use rayon::prelude::*;
use sha2::{Digest as _, Sha256};
use std::hint::black_box;

fn random_pages(n: usize) -> Vec<u8> {
    let mut input = vec![0u8; n * MESSAGE_SIZE];
    rand::rng().fill(&mut input[..]);
    input
}

// =============================================================================
// BENCHMARK 1: SINGLE PAGE
// =============================================================================

/// One 4 KiB page through each contender.
fn bench_single_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Single-Page");
    let page = random_pages(1);
    group.throughput(Throughput::Bytes(MESSAGE_SIZE as u64));

    group.bench_function("funnelhash-256", |b| {
        b.iter(|| funnelhash::digest256(black_box(&page)))
    });
    group.bench_function("funnelhash-128", |b| {
        b.iter(|| funnelhash::digest128(black_box(&page)))
    });
    group.bench_function("plain-sm3", |b| {
        b.iter(|| funnelhash::plain256(black_box(&page)))
    });
    group.bench_function("sha256", |b| b.iter(|| Sha256::digest(black_box(&page))));

    let digest = funnelhash::digest256(&page).unwrap();
    group.bench_function("verify256", |b| {
        b.iter(|| funnelhash::verify256(black_box(&page), black_box(&digest)))
    });

    group.finish();
}

// =============================================================================
// BENCHMARK 2: FUNNEL CONFIGURATIONS
// =============================================================================

/// Every ratio with and without the block mix.
fn bench_configurations(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Configurations");
    let ctx = FunnelContext::default();
    let page = random_pages(1);
    group.throughput(Throughput::Bytes(MESSAGE_SIZE as u64));

    for ratio in [8, 16, 32, 64] {
        for mix in [MixStrategy::XorFold, MixStrategy::BlockMix] {
            let config = Config::new(ratio, mix, 256).unwrap();
            group.bench_with_input(
                BenchmarkId::new(mix.name(), format!("r{ratio}")),
                &config,
                |b, config| b.iter(|| funnelhash::digest_with(&ctx, config, black_box(&page))),
            );
        }
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: BATCH SCALING
// =============================================================================

/// Dispatcher scaling from 1 to N workers over 16 MiB of pages.
fn bench_batch_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("3-Batch-Scaling");
    group.sample_size(20);

    let ctx = FunnelContext::default();
    let config = Config::default();
    let pages = 4096;
    let input = random_pages(pages);
    group.throughput(Throughput::Bytes(input.len() as u64));

    let max_threads = num_cpus::get();
    let thread_counts: Vec<usize> = [1, 2, 4, 8, 16, 32]
        .iter()
        .copied()
        .filter(|&t| t <= max_threads)
        .collect();

    for threads in thread_counts {
        group.bench_with_input(
            BenchmarkId::new("pinned", format!("{threads}threads")),
            &threads,
            |b, &t| b.iter(|| funnelhash::dispatch(&ctx, &config, black_box(&input), t)),
        );
        group.bench_with_input(
            BenchmarkId::new("unpinned", format!("{threads}threads")),
            &threads,
            |b, &t| {
                let options = DispatchOptions { pin_workers: false };
                b.iter(|| funnelhash::dispatch_with(&ctx, &config, black_box(&input), t, options))
            },
        );
    }

    // Work-stealing reference for the static partitioning above
    group.bench_function("rayon-par-chunks", |b| {
        b.iter(|| {
            black_box(&input)
                .par_chunks_exact(MESSAGE_SIZE)
                .map(|page| funnelhash::digest256(page).unwrap())
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

// =============================================================================
// MAIN
// =============================================================================

criterion_group!(
    benches,
    bench_single_page,
    bench_configurations,
    bench_batch_scaling,
);
criterion_main!(benches);
