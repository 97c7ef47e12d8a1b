//! SM3 Compression Function
//!
//! The finalization hash core: message expansion, 64 rounds, feed-forward.
//! Pure and allocation-free; every call owns its schedule on the stack.

use crate::kernels::constants::{
    BLOCK_SIZE, DIGEST_SIZE, IV, LINEAR_ROUNDS, ROUNDS, ROUND_CONSTANTS_ROTATED, SCHEDULE_LEN,
};

/// Eight 32-bit chaining words `A..H`.
pub type HashState = [u32; 8];

// =============================================================================
// PERMUTATIONS
// =============================================================================

#[inline(always)]
const fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
const fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

// =============================================================================
// MESSAGE SCHEDULE
// =============================================================================

/// Expand one block into `W[0..68]`. `W'[j] = W[j] ^ W[j + 4]` is derived on
/// the fly inside the round loop.
#[inline(always)]
fn expand(block: &[u8; BLOCK_SIZE]) -> [u32; SCHEDULE_LEN] {
    let mut w = [0u32; SCHEDULE_LEN];
    for (wi, word) in w.iter_mut().zip(block.chunks_exact(4)) {
        *wi = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for j in 16..SCHEDULE_LEN {
        w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
            ^ w[j - 13].rotate_left(7)
            ^ w[j - 6];
    }
    w
}

// =============================================================================
// COMPRESSION
// =============================================================================

/// One round with the boolean functions `ff` / `gg` for its phase.
macro_rules! round {
    ($v:ident, $w:ident, $j:expr, $ff:expr, $gg:expr) => {{
        let [a, b, c, d, e, f, g, h] = $v;
        let a12 = a.rotate_left(12);
        let ss1 = a12
            .wrapping_add(e)
            .wrapping_add(ROUND_CONSTANTS_ROTATED[$j])
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        let tt1 = $ff(a, b, c)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add($w[$j] ^ $w[$j + 4]);
        let tt2 = $gg(e, f, g)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add($w[$j]);
        $v = [
            tt1,
            a,
            b.rotate_left(9),
            c,
            p0(tt2),
            e,
            f.rotate_left(19),
            g,
        ];
    }};
}

#[inline(always)]
const fn ff_linear(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
const fn ff_majority(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (x & z) | (y & z)
}

#[inline(always)]
const fn gg_choice(x: u32, y: u32, z: u32) -> u32 {
    (x & y) | (!x & z)
}

/// Absorb one 64-byte block: `state' = state ^ rounds(state, block)`.
#[must_use]
pub fn compress(state: &HashState, block: &[u8; BLOCK_SIZE]) -> HashState {
    let w = expand(block);
    let mut v = *state;

    for j in 0..LINEAR_ROUNDS {
        round!(v, w, j, ff_linear, ff_linear);
    }
    for j in LINEAR_ROUNDS..ROUNDS {
        round!(v, w, j, ff_majority, gg_choice);
    }

    // Feed-forward
    let mut out = *state;
    for (o, x) in out.iter_mut().zip(v) {
        *o ^= x;
    }
    out
}

/// Thread `state` through every 64-byte block of `data`.
///
/// `data.len()` must be a multiple of `BLOCK_SIZE`; the funnel guarantees this
/// for every supported ratio.
#[must_use]
pub fn absorb(mut state: HashState, data: &[u8]) -> HashState {
    debug_assert!(data.len().is_multiple_of(BLOCK_SIZE));
    for block in data.chunks_exact(BLOCK_SIZE) {
        let mut buf = [0u8; BLOCK_SIZE];
        buf.copy_from_slice(block);
        state = compress(&state, &buf);
    }
    state
}

/// Big-endian serialization of the chaining words.
#[must_use]
pub fn to_bytes(state: &HashState) -> [u8; DIGEST_SIZE] {
    let mut out = [0u8; DIGEST_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    out
}

/// Unpadded SM3 over whole blocks, starting from the public IV.
#[must_use]
pub fn digest_blocks(data: &[u8]) -> [u8; DIGEST_SIZE] {
    to_bytes(&absorb(IV, data))
}
