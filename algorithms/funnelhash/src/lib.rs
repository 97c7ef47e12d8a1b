//! # Funnelhash
//!
//! Integrity digest for fixed 4 KiB pages. An entropy funnel folds each page
//! down to a few SM3 blocks, so the compression function runs 8 to 64 times
//! fewer rounds than a plain SM3 over the page. A scoped-thread dispatcher
//! hashes large batches of pages in parallel.

//! # Usage
//! ```rust
//! use funnelhash::{Config, FunnelContext, MixStrategy};
//!
//! // 1. Default digest (ratio 8, XOR-fold, 256 bits)
//! let page = [0u8; 4096];
//! let digest = funnelhash::digest256(&page)?;
//! assert!(funnelhash::verify256(&page, &digest)?);
//!
//! // 2. Explicit configuration
//! let ctx = FunnelContext::default();
//! let config = Config::new(32, MixStrategy::BlockMix, 128)?;
//! let short = funnelhash::digest_with(&ctx, &config, &page)?;
//! assert_eq!(short.as_bytes().len(), 16);
//!
//! // 3. Batches, one digest per page, in order
//! let pages = vec![0u8; 4096 * 8];
//! let digests = funnelhash::dispatch(&ctx, &config, &pages, 4)?;
//! assert_eq!(digests.len(), 8);
//! # Ok::<(), funnelhash::Error>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod context;
mod engine;
mod ffi;
// Re-export internal kernels for benchmarking/testing, but hide from docs
#[doc(hidden)]
pub mod kernels;
mod oneshot;
mod streaming;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use context::FunnelContext;
#[cfg(feature = "digest-trait")]
pub use digest;
pub use engine::parallel::{
    dispatch, dispatch_pages, dispatch_pages_with, dispatch_with, DispatchOptions,
};
pub use kernels::constants::{DIGEST_SIZE, MESSAGE_SIZE, SHORT_DIGEST_SIZE};
pub use oneshot::{
    digest128, digest256, digest_with, plain256, verify128, verify256, verify_with,
};
pub use streaming::Sm3;
pub use types::{
    CompressionRatio, Config, Digest, DigestWidth, Error, FunnelKey, MixStrategy, Result,
};

/// Returns the name of the block-mix backend this CPU would use.
#[must_use]
pub fn active_backend() -> &'static str {
    engine::active_backend_name()
}
