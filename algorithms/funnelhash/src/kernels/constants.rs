//! Funnelhash Kernel Constants
//!
//! The finalization hash is SM3 (GB/T 32905-2016). The IV and round constants
//! below are the canonical published values; the known-answer tests in
//! `kernels::sm3` pin them against the standard's test vectors.

// =============================================================================
// MESSAGE GEOMETRY
// =============================================================================

/// Fixed message size handled by the fast path (one 4 KiB page).
pub const MESSAGE_SIZE: usize = 4096;

/// Block size of the SM3 compression function (in bytes).
pub const BLOCK_SIZE: usize = 64;

/// Unit processed by the single-round block mixer (one 128-bit AES state).
pub const VEC_SIZE: usize = 16;

/// Full digest size in bytes (256-bit).
pub const DIGEST_SIZE: usize = 32;

/// Truncated digest size in bytes (128-bit).
pub const SHORT_DIGEST_SIZE: usize = 16;

/// Compression ratios accepted by the funnel. Every quotient `4096 / r` is a
/// multiple of `BLOCK_SIZE`.
pub const SUPPORTED_RATIOS: [u32; 4] = [8, 16, 32, 64];

// =============================================================================
// SM3
// =============================================================================

/// Number of compression rounds.
pub const ROUNDS: usize = 64;

/// Rounds `0..LINEAR_ROUNDS` use the XOR boolean functions, the rest use
/// majority / choice.
pub const LINEAR_ROUNDS: usize = 16;

/// Expanded message schedule length (`W[0..68]`).
pub const SCHEDULE_LEN: usize = 68;

/// Public initialization vector.
pub const IV: [u32; 8] = [
    0x7380_166F,
    0x4914_B2B9,
    0x1724_42D7,
    0xDA8A_0600,
    0xA96F_30BC,
    0x1631_38AA,
    0xE38D_EE4D,
    0xB0FB_0E4E,
];

/// Round constant for rounds 0..16.
pub const T_LINEAR: u32 = 0x79CC_4519;

/// Round constant for rounds 16..64.
pub const T_NONLINEAR: u32 = 0x7A87_9D8A;

/// Per-round constant table `Tj`.
pub const ROUND_CONSTANTS: [u32; ROUNDS] = {
    let mut t = [0u32; ROUNDS];
    let mut j = 0;
    while j < ROUNDS {
        t[j] = if j < LINEAR_ROUNDS { T_LINEAR } else { T_NONLINEAR };
        j += 1;
    }
    t
};

/// `rotl(Tj, j mod 32)`, hoisted out of the round loop.
#[allow(clippy::cast_possible_truncation)]
pub const ROUND_CONSTANTS_ROTATED: [u32; ROUNDS] = {
    let mut t = [0u32; ROUNDS];
    let mut j = 0;
    while j < ROUNDS {
        t[j] = ROUND_CONSTANTS[j].rotate_left((j % 32) as u32);
        j += 1;
    }
    t
};

// =============================================================================
// FUNNEL
// =============================================================================

/// AES GF(2^8) reduction polynomial: x^8 + x^4 + x^3 + x + 1
pub const GF_POLY: u8 = 0x1b;

/// Default round key for the block mixer. Public and non-secret: the funnel is
/// an entropy reducer, not a MAC.
pub const DEFAULT_ROUND_KEY: [u8; VEC_SIZE] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];
