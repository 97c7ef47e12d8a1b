//! Streaming SM3 Hasher
//!
//! Standard, padded SM3 over messages of any length. This is the plain
//! baseline the funnel digest is measured against, and the known-answer
//! anchor for the compression function.

use crate::kernels::constants::{BLOCK_SIZE, DIGEST_SIZE, IV};
use crate::kernels::sm3::{self, HashState};

#[cfg(feature = "digest-trait")]
use digest::typenum::U32;
#[cfg(feature = "digest-trait")]
use digest::Output;
#[cfg(feature = "digest-trait")]
use digest::{FixedOutput, HashMarker, OutputSizeUser, Reset, Update};

/// Offset of the 64-bit length field in the final block.
const LENGTH_OFFSET: usize = BLOCK_SIZE - 8;

// =============================================================================
// STREAMING HASHER
// =============================================================================

/// Incremental SM3 hasher.
#[derive(Clone)]
pub struct Sm3 {
    state: HashState,
    /// Partial block (always < `BLOCK_SIZE` bytes used)
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
    /// Total bytes absorbed
    total_len: u64,
}

impl Sm3 {
    /// Fresh hasher at the public IV.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: IV,
            buffer: [0u8; BLOCK_SIZE],
            buffered: 0,
            total_len: 0,
        }
    }

    /// One-shot convenience.
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    /// Absorb more input.
    pub fn update(&mut self, mut data: &[u8]) {
        self.total_len = self.total_len.wrapping_add(data.len() as u64);

        if self.buffered > 0 {
            let take = (BLOCK_SIZE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered < BLOCK_SIZE {
                return;
            }
            self.state = sm3::compress(&self.state, &self.buffer);
            self.buffered = 0;
        }

        // Whole blocks straight from the caller's slice
        let (blocks, tail) = data.as_chunks::<BLOCK_SIZE>();
        for block in blocks {
            self.state = sm3::compress(&self.state, block);
        }

        self.buffer[..tail.len()].copy_from_slice(tail);
        self.buffered = tail.len();
    }

    /// Pad, absorb the final block(s) and return the digest.
    #[must_use]
    pub fn finalize(mut self) -> [u8; DIGEST_SIZE] {
        let bit_len = self.total_len.wrapping_mul(8);

        self.buffer[self.buffered] = 0x80;
        self.buffer[self.buffered + 1..].fill(0);
        if self.buffered >= LENGTH_OFFSET {
            self.state = sm3::compress(&self.state, &self.buffer);
            self.buffer = [0u8; BLOCK_SIZE];
        }
        self.buffer[LENGTH_OFFSET..].copy_from_slice(&bit_len.to_be_bytes());
        self.state = sm3::compress(&self.state, &self.buffer);

        sm3::to_bytes(&self.state)
    }

    /// Reset to the IV for reuse.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TRAIT IMPL
// =============================================================================

impl Default for Sm3 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "digest-trait")]
impl OutputSizeUser for Sm3 {
    type OutputSize = U32;
}

#[cfg(feature = "digest-trait")]
impl Update for Sm3 {
    fn update(&mut self, data: &[u8]) {
        self.update(data);
    }
}

#[cfg(feature = "digest-trait")]
impl FixedOutput for Sm3 {
    fn finalize_into(self, out: &mut Output<Self>) {
        let res = self.finalize();
        out.copy_from_slice(&res);
    }
}

#[cfg(feature = "digest-trait")]
impl Reset for Sm3 {
    fn reset(&mut self) {
        self.reset();
    }
}

#[cfg(feature = "digest-trait")]
impl HashMarker for Sm3 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_answers() {
        assert_eq!(
            hex::encode(Sm3::digest(b"abc")),
            "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
        );
        assert_eq!(
            hex::encode(Sm3::digest(&b"abcd".repeat(16))),
            "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
        );
    }

    #[test]
    fn test_split_updates_match_oneshot() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 + 3) as u8).collect();
        let expected = Sm3::digest(&data);
        for split in [0, 1, 55, 56, 63, 64, 65, 128, 999, 1000] {
            let mut hasher = Sm3::new();
            hasher.update(&data[..split]);
            hasher.update(&data[split..]);
            assert_eq!(hasher.finalize(), expected, "split at {split}");
        }
    }

    #[test]
    fn test_reset() {
        let mut hasher = Sm3::new();
        hasher.update(b"garbage");
        hasher.reset();
        hasher.update(b"abc");
        assert_eq!(hasher.finalize(), Sm3::digest(b"abc"));
    }
}
