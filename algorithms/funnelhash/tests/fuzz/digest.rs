use bolero::check;
use funnelhash::{digest128, digest256, verify256, MESSAGE_SIZE};

#[test]
fn fuzz_single_page() {
    check!().with_type::<Vec<u8>>().for_each(|data| {
        // =============================================================================
        // LENGTH GATE
        // =============================================================================

        // Arbitrary bytes are only accepted at exactly one page.
        let res = digest256(data);
        assert_eq!(res.is_ok(), data.len() == MESSAGE_SIZE);

        // =============================================================================
        // PADDED PAGE
        // =============================================================================

        // Stretch the fuzz input into a page so the funnel sees real content.
        let mut page = [0u8; MESSAGE_SIZE];
        for (dst, src) in page.iter_mut().zip(data.iter().cycle()) {
            *dst = *src;
        }

        if let (Ok(full), Ok(short)) = (digest256(&page), digest128(&page)) {
            assert_eq!(short, full[..16], "128-bit digest is not a prefix");
            assert!(matches!(verify256(&page, &full), Ok(true)));

            let mut corrupted = page;
            corrupted[data.len() % MESSAGE_SIZE] ^= 0x01;
            assert!(
                matches!(verify256(&corrupted, &full), Ok(false)),
                "verify256() succeeded on corrupted page"
            );
        }
    });
}
