use bolero::check;
use funnelhash::{digest_with, dispatch, Config, FunnelContext, MixStrategy, MESSAGE_SIZE};

#[test]
fn fuzz_dispatch_matches_sequential() {
    let ctx = FunnelContext::default();
    let config = Config {
        mix: MixStrategy::BlockMix,
        ..Config::default()
    };

    check!().with_type::<(Vec<u8>, u8)>().for_each(|(seed, workers)| {
        // Up to 8 pages derived from the seed bytes.
        let pages = seed.len() % 9;
        let mut buf = vec![0u8; pages * MESSAGE_SIZE];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = seed.get(i % seed.len().max(1)).copied().unwrap_or(0) ^ (i / MESSAGE_SIZE) as u8;
        }

        let Ok(parallel) = dispatch(&ctx, &config, &buf, usize::from(*workers)) else {
            panic!("dispatch failed on a well-formed batch");
        };
        assert_eq!(parallel.len(), pages);

        for (page, digest) in buf.chunks_exact(MESSAGE_SIZE).zip(&parallel) {
            let Ok(expected) = digest_with(&ctx, &config, page) else {
                panic!("single-page digest failed");
            };
            assert_eq!(*digest, expected, "dispatch reordered or corrupted a digest");
        }
    });
}
