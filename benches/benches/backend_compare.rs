//! Backend Comparison Benchmark
//!
//! Compares the runtime-selected block mixer against the explicit hardware
//! kernel and the portable fallback.

#![allow(missing_docs)]
#![allow(unsafe_code)]
#![allow(clippy::unwrap_used)]
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use funnelhash::kernels;
use funnelhash::{Config, FunnelContext, FunnelKey, MixStrategy, MESSAGE_SIZE};
use std::hint::black_box;

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_mixers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Block-Mix Kernels");
    let page = [0x5Au8; MESSAGE_SIZE];
    let key = [0x0Fu8; 16];
    let mut out = [0u8; MESSAGE_SIZE];
    group.throughput(Throughput::Bytes(MESSAGE_SIZE as u64));

    // 1. AES-NI - Explicit kernel (bypasses the context)
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if is_x86_feature_detected!("aes") {
        group.bench_function("AES-NI Native", |b| {
            b.iter(|| unsafe { kernels::aesni::mix_blocks(black_box(&page), &key, &mut out) });
        });
    }

    // 2. ARMv8 AES - Explicit kernel
    #[cfg(target_arch = "aarch64")]
    if std::arch::is_aarch64_feature_detected!("aes") {
        group.bench_function("ARMv8 AES Native", |b| {
            b.iter(|| unsafe { kernels::neon::mix_blocks(black_box(&page), &key, &mut out) });
        });
    }

    // 3. Portable - Table-driven software round
    group.bench_function("Portable (No SIMD)", |b| {
        b.iter(|| kernels::portable::mix_blocks(black_box(&page), &key, &mut out));
    });

    // 4. Fold alone, to separate mixing cost from folding cost
    group.bench_function("Fold only (ratio 8)", |b| {
        b.iter(|| kernels::funnel::fold(black_box(&page), 8));
    });

    group.finish();
}

fn bench_contexts(c: &mut Criterion) {
    let mut group = c.benchmark_group("Block-Mix Digest");
    let page = [0xC3u8; MESSAGE_SIZE];
    let config = Config {
        mix: MixStrategy::BlockMix,
        ..Config::default()
    };
    group.throughput(Throughput::Bytes(MESSAGE_SIZE as u64));

    let detected = FunnelContext::default();
    let portable = FunnelContext::portable(FunnelKey::default());
    println!(
        "{} digest: {}",
        detected.backend_name(),
        hex::encode(funnelhash::digest_with(&detected, &config, &page).unwrap())
    );

    group.bench_function(format!("Detected ({})", detected.backend_name()), |b| {
        b.iter(|| funnelhash::digest_with(&detected, &config, black_box(&page)));
    });
    group.bench_function("Portable", |b| {
        b.iter(|| funnelhash::digest_with(&portable, &config, black_box(&page)));
    });

    group.finish();
}

criterion_group!(benches, bench_mixers, bench_contexts);
criterion_main!(benches);
