//! Portable block mixer.
//!
//! Software AES round used when neither AES-NI nor the ARMv8 crypto
//! extensions are available. Must stay byte-identical to the hardware kernels.

use crate::kernels::constants::{MESSAGE_SIZE, VEC_SIZE};

pub(crate) mod utils;

pub use utils::{aes_round, gf_double, gf_double_x8};

/// Davies–Meyer single-round mix of every 16-byte unit:
/// `out[i] = AESround_key(src[i]) ^ src[i]`.
pub fn mix_blocks(src: &[u8; MESSAGE_SIZE], key: &[u8; VEC_SIZE], out: &mut [u8; MESSAGE_SIZE]) {
    for (s, o) in src
        .chunks_exact(VEC_SIZE)
        .zip(out.chunks_exact_mut(VEC_SIZE))
    {
        let mut unit = [0u8; VEC_SIZE];
        unit.copy_from_slice(s);
        let encrypted = aes_round(&unit, key);
        for ((dst, e), m) in o.iter_mut().zip(encrypted).zip(unit) {
            *dst = e ^ m;
        }
    }
}
