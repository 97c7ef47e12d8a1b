//! Public API Layer
//!
//! Single-page entry points: funnel, then SM3 over the funnel output from the
//! public IV. Stateless between calls.

use subtle::ConstantTimeEq;

use crate::context::FunnelContext;
use crate::kernels::constants::{DEFAULT_ROUND_KEY, DIGEST_SIZE, MESSAGE_SIZE, SHORT_DIGEST_SIZE};
use crate::kernels::sm3;
use crate::streaming::Sm3;
use crate::types::{check_page, Config, Digest, FunnelKey, Result};

/// Context for the default configuration. `XorFold` never calls the mixer, so
/// no CPU probing is needed here.
const DEFAULT_CONTEXT: FunnelContext = FunnelContext::portable(FunnelKey::new(DEFAULT_ROUND_KEY));

// =============================================================================
// DEFAULT CONFIGURATION
// =============================================================================

/// 256-bit digest of one 4 KiB page (ratio 8, XOR-fold).
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
///
/// # Example
/// ```rust
/// let page = [0u8; 4096];
/// let digest = funnelhash::digest256(&page)?;
/// assert_eq!(digest.len(), 32);
/// # Ok::<(), funnelhash::Error>(())
/// ```
pub fn digest256(input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let page = check_page(input)?;
    Ok(full_digest(&DEFAULT_CONTEXT, &Config::default(), page))
}

/// 128-bit digest: exactly the first 16 bytes of [`digest256`].
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
pub fn digest128(input: &[u8]) -> Result<[u8; SHORT_DIGEST_SIZE]> {
    let full = digest256(input)?;
    let mut short = [0u8; SHORT_DIGEST_SIZE];
    short.copy_from_slice(&full[..SHORT_DIGEST_SIZE]);
    Ok(short)
}

// =============================================================================
// CONFIGURED
// =============================================================================

/// Digest one page with an explicit context and configuration.
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
///
/// # Example
/// ```rust
/// use funnelhash::{digest_with, Config, FunnelContext, MixStrategy};
///
/// let ctx = FunnelContext::default();
/// let config = Config::new(16, MixStrategy::BlockMix, 128)?;
/// let digest = digest_with(&ctx, &config, &[7u8; 4096])?;
/// assert_eq!(digest.as_bytes().len(), 16);
/// # Ok::<(), funnelhash::Error>(())
/// ```
pub fn digest_with(ctx: &FunnelContext, config: &Config, input: &[u8]) -> Result<Digest> {
    let page = check_page(input)?;
    Ok(digest_page(ctx, config, page))
}

/// Infallible core shared with the batch dispatcher.
pub(crate) fn digest_page(
    ctx: &FunnelContext,
    config: &Config,
    page: &[u8; MESSAGE_SIZE],
) -> Digest {
    Digest::from_full(full_digest(ctx, config, page), config.width)
}

/// Funnel + SM3, always at full width; narrower widths truncate this.
fn full_digest(ctx: &FunnelContext, config: &Config, page: &[u8; MESSAGE_SIZE]) -> [u8; DIGEST_SIZE] {
    let funneled = ctx.funnel(page, config.ratio, config.mix);
    sm3::digest_blocks(funneled.as_bytes())
}

// =============================================================================
// COMPARATOR
// =============================================================================

/// Plain (non-funneled) baseline: standard padded SM3 over the whole page.
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
pub fn plain256(input: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let page = check_page(input)?;
    Ok(Sm3::digest(page))
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Verify a 256-bit digest in constant time.
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
///
/// # Example
/// ```rust
/// let page = [0xA5u8; 4096];
/// let digest = funnelhash::digest256(&page)?;
/// assert!(funnelhash::verify256(&page, &digest)?);
/// # Ok::<(), funnelhash::Error>(())
/// ```
pub fn verify256(input: &[u8], expected: &[u8; DIGEST_SIZE]) -> Result<bool> {
    let computed = digest256(input)?;
    Ok(computed.ct_eq(expected).into())
}

/// Verify a 128-bit digest in constant time.
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
pub fn verify128(input: &[u8], expected: &[u8; SHORT_DIGEST_SIZE]) -> Result<bool> {
    let computed = digest128(input)?;
    Ok(computed.ct_eq(expected).into())
}

/// Verify a configured digest in constant time. A width mismatch is a mismatch.
///
/// # Errors
/// `InvalidInputLength` unless `input.len() == 4096`.
pub fn verify_with(
    ctx: &FunnelContext,
    config: &Config,
    input: &[u8],
    expected: &Digest,
) -> Result<bool> {
    let computed = digest_with(ctx, config, input)?;
    if computed.width() != expected.width() {
        return Ok(false);
    }
    Ok(computed.as_bytes().ct_eq(expected.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompressionRatio, DigestWidth, MixStrategy};

    #[test]
    fn test_default_context_matches_detected_context() {
        let page = [0x3Cu8; MESSAGE_SIZE];
        let detected = FunnelContext::default();
        let full = digest_with(&detected, &Config::default(), &page).ok();
        assert_eq!(full.map(|d| d.as_bytes().to_vec()), digest256(&page).ok().map(Vec::from));
    }

    #[test]
    fn test_width_only_truncates() {
        let ctx = FunnelContext::default();
        let page = [0x01u8; MESSAGE_SIZE];
        let config = Config {
            ratio: CompressionRatio::R32,
            mix: MixStrategy::BlockMix,
            width: DigestWidth::Bits256,
        };
        let short_config = Config {
            width: DigestWidth::Bits128,
            ..config
        };
        let full = digest_page(&ctx, &config, &page);
        let short = digest_page(&ctx, &short_config, &page);
        assert_eq!(short.as_bytes(), &full.as_bytes()[..16]);
    }

    #[test]
    fn test_verify_width_mismatch() {
        let ctx = FunnelContext::default();
        let page = [0u8; MESSAGE_SIZE];
        let full = digest_page(&ctx, &Config::default(), &page);
        let short_config = Config {
            width: DigestWidth::Bits128,
            ..Config::default()
        };
        assert!(matches!(verify_with(&ctx, &short_config, &page, &full), Ok(false)));
        assert!(matches!(verify_with(&ctx, &Config::default(), &page, &full), Ok(true)));
    }
}
