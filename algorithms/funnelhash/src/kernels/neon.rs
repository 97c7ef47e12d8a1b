//! ARMv8 Crypto Extension Block Mixer
//!
//! `AESE` adds the key before `SubBytes`, so the round runs with a zero key and
//! the real key is XORed after `AESMC` to match `AESENC` semantics.

use crate::kernels::constants::{MESSAGE_SIZE, VEC_SIZE};

use core::arch::aarch64::{vaeseq_u8, vaesmcq_u8, vdupq_n_u8, veorq_u8, vld1q_u8, vst1q_u8};

/// Mix every 16-byte unit of `src` into `out`.
///
/// # Safety
/// The CPU must support the `aes` feature. Only called through the dispatcher
/// after runtime detection.
#[target_feature(enable = "aes")]
#[allow(unsafe_code)]
pub unsafe fn mix_blocks(
    src: &[u8; MESSAGE_SIZE],
    key: &[u8; VEC_SIZE],
    out: &mut [u8; MESSAGE_SIZE],
) {
    let zero = vdupq_n_u8(0);
    let k = vld1q_u8(key.as_ptr());
    for (s, o) in src
        .chunks_exact(VEC_SIZE)
        .zip(out.chunks_exact_mut(VEC_SIZE))
    {
        // SAFETY: both chunks are exactly VEC_SIZE bytes.
        let m = vld1q_u8(s.as_ptr());
        let e = veorq_u8(vaesmcq_u8(vaeseq_u8(m, zero)), k);
        vst1q_u8(o.as_mut_ptr(), veorq_u8(e, m));
    }
}
