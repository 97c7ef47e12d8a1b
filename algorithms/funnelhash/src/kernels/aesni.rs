//! AES-NI Block Mixer
//!
//! One `AESENC` per 16-byte unit with a Davies–Meyer feed-forward.

use crate::kernels::constants::{MESSAGE_SIZE, VEC_SIZE};

#[cfg(target_arch = "x86")]
use core::arch::x86::{_mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{_mm_aesenc_si128, _mm_loadu_si128, _mm_storeu_si128, _mm_xor_si128};

/// Mix every 16-byte unit of `src` into `out`.
///
/// # Safety
/// The CPU must support AES and SSE2. Only called through the dispatcher after
/// runtime detection.
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
#[allow(unsafe_code)]
pub unsafe fn mix_blocks(
    src: &[u8; MESSAGE_SIZE],
    key: &[u8; VEC_SIZE],
    out: &mut [u8; MESSAGE_SIZE],
) {
    let k = _mm_loadu_si128(key.as_ptr().cast());
    for (s, o) in src
        .chunks_exact(VEC_SIZE)
        .zip(out.chunks_exact_mut(VEC_SIZE))
    {
        // SAFETY: both chunks are exactly VEC_SIZE bytes; unaligned load/store.
        let m = _mm_loadu_si128(s.as_ptr().cast());
        let e = _mm_aesenc_si128(m, k);
        _mm_storeu_si128(o.as_mut_ptr().cast(), _mm_xor_si128(e, m));
    }
}
