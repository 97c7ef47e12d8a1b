//! Golden Test Vectors for Funnelhash
//!
//! Checks every ratio and mix strategy against the canonical JSON vectors,
//! on both the detected backend and the portable mixer.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use funnelhash::{Config, FunnelContext, FunnelKey, MixStrategy};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

#[derive(Deserialize)]
struct Vector {
    name: String,
    input: String,
    ratio: u32,
    mix: String,
    hash: String,
}

#[derive(Deserialize)]
struct TestVectors {
    vectors: Vec<Vector>,
}

fn load() -> TestVectors {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/test_vectors.json");
    let file = File::open(path).expect("Failed to open test_vectors.json");
    serde_json::from_reader(BufReader::new(file)).expect("Failed to parse JSON")
}

fn page(input: &str) -> Vec<u8> {
    match input {
        "ZERO" => vec![0u8; 4096],
        "ONES" => vec![0xFFu8; 4096],
        "COUNTER" => (0..4096u32).map(|i| (i % 256) as u8).collect(),
        "ASCII_A" => vec![b'A'; 4096],
        other => panic!("unknown vector input {other}"),
    }
}

#[test]
fn test_golden_vectors() {
    let data = load();
    assert_eq!(data.vectors.len(), 32);

    let contexts = [
        FunnelContext::default(),
        FunnelContext::portable(FunnelKey::default()),
    ];

    println!("\n=== Verifying Golden Vectors ===");
    for vector in &data.vectors {
        let mix: MixStrategy = vector.mix.parse().expect("bad mix name");
        let config = Config::new(vector.ratio, mix, 256).expect("bad ratio");
        let input = page(&vector.input);

        for ctx in &contexts {
            let digest = funnelhash::digest_with(ctx, &config, &input).unwrap();
            assert_eq!(
                hex::encode(digest.as_bytes()),
                vector.hash,
                "Vector mismatch: {} on {}",
                vector.name,
                ctx.backend_name()
            );
        }
        println!("✅ {:<24} | {}", vector.name, vector.hash);
    }
    println!("================================\n");
}

#[test]
fn test_default_entry_points_match_vectors() {
    let data = load();
    for vector in data
        .vectors
        .iter()
        .filter(|v| v.ratio == 8 && v.mix == "xor-fold")
    {
        let input = page(&vector.input);
        let full = funnelhash::digest256(&input).unwrap();
        let short = funnelhash::digest128(&input).unwrap();
        assert_eq!(hex::encode(full), vector.hash, "{}", vector.name);
        assert_eq!(hex::encode(short), vector.hash[..32], "{}", vector.name);
    }
}

#[test]
fn test_plain_sm3_page() {
    let zero = funnelhash::plain256(&[0u8; 4096]).unwrap();
    assert_eq!(
        hex::encode(zero),
        "996d9ccd1272a25d574ed05aaa72c6cfd9736d3cdd0ff72a45031f6a1c4092ba"
    );
}
