//! Entropy Funnel Fold
//!
//! Reduces a 4 KiB page to `4096 / ratio` bytes. Output byte `k` is the Horner
//! sum over groups `g` of `src[g * n + k]` with weight `3^(ratio - 1 - g)` in
//! GF(2^8). `0x03` generates the multiplicative group (order 255), so the
//! weights of up to 64 groups are pairwise distinct and nonzero: every input
//! byte reaches exactly one output byte through a bijective weight, and no two
//! groups can cancel each other.

use crate::kernels::constants::{BLOCK_SIZE, MESSAGE_SIZE};
use crate::kernels::portable::gf_double_x8;

/// Multiply eight packed field elements by `0x03`.
#[inline(always)]
const fn gf_triple_x8(x: u64) -> u64 {
    gf_double_x8(x) ^ x
}

/// Largest funnel output (ratio 8).
pub const MAX_FUNNEL_SIZE: usize = MESSAGE_SIZE / 8;

const LANE: usize = 8;

/// Funnel output living on the stack; only the first `len` bytes are valid.
#[derive(Clone)]
pub struct FunnelBuffer {
    bytes: [u8; MAX_FUNNEL_SIZE],
    len: usize,
}

impl FunnelBuffer {
    /// The folded bytes. Always a whole number of SM3 blocks.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of folded bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Never true for a supported ratio.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Fold `src` into `MESSAGE_SIZE / ratio` bytes.
///
/// `ratio` must already be validated (see `CompressionRatio`).
#[must_use]
pub fn fold(src: &[u8; MESSAGE_SIZE], ratio: usize) -> FunnelBuffer {
    let n = MESSAGE_SIZE / ratio;
    debug_assert!(n <= MAX_FUNNEL_SIZE && n.is_multiple_of(BLOCK_SIZE));

    let lanes = n / LANE;
    let mut acc = [0u64; MAX_FUNNEL_SIZE / LANE];
    for group in src.chunks_exact(n) {
        for (a, word) in acc[..lanes].iter_mut().zip(group.chunks_exact(LANE)) {
            let mut w = [0u8; LANE];
            w.copy_from_slice(word);
            *a = gf_triple_x8(*a) ^ u64::from_le_bytes(w);
        }
    }

    let mut out = FunnelBuffer {
        bytes: [0u8; MAX_FUNNEL_SIZE],
        len: n,
    };
    for (dst, a) in out.bytes.chunks_exact_mut(LANE).zip(&acc[..lanes]) {
        dst.copy_from_slice(&a.to_le_bytes());
    }
    out
}
