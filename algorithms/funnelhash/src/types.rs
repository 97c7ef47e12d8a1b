//! Shared types used across the funnelhash library.

use core::fmt;
use core::str::FromStr;

use crate::kernels::constants::{
    DIGEST_SIZE, MESSAGE_SIZE, SHORT_DIGEST_SIZE, SUPPORTED_RATIOS, VEC_SIZE,
};

// =============================================================================
// KERNEL INTERFACE
// =============================================================================

/// Unified block-mixer signature: `(page, round_key, out)`.
///
/// The AES-NI, ARMv8 and portable mixers all implement this signature so the
/// dispatcher can pick one at runtime.
pub type MixFn = fn(&[u8; MESSAGE_SIZE], &[u8; VEC_SIZE], &mut [u8; MESSAGE_SIZE]);

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the digest and dispatch APIs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message was not exactly one page long.
    #[error("input must be {expected} bytes, got {actual}")]
    InvalidInputLength {
        /// Required length.
        expected: usize,
        /// Length supplied by the caller.
        actual: usize,
    },
    /// A configuration value is outside the supported set.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The dispatcher could not spawn a worker thread; no digests were produced.
    #[error("failed to spawn worker {worker}")]
    WorkerCreationFailure {
        /// Index of the worker that failed to start.
        worker: usize,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for funnelhash operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Reject anything that is not exactly one page.
pub(crate) fn check_page(input: &[u8]) -> Result<&[u8; MESSAGE_SIZE]> {
    input.try_into().map_err(|_| Error::InvalidInputLength {
        expected: MESSAGE_SIZE,
        actual: input.len(),
    })
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How many input bytes the funnel folds into one output byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressionRatio(u32);

impl CompressionRatio {
    /// 4096 → 512 bytes (default).
    pub const R8: Self = Self(8);
    /// 4096 → 256 bytes.
    pub const R16: Self = Self(16);
    /// 4096 → 128 bytes.
    pub const R32: Self = Self(32);
    /// 4096 → 64 bytes (a single SM3 block).
    pub const R64: Self = Self(64);

    /// Validate a ratio.
    ///
    /// # Errors
    /// `InvalidConfiguration` unless `ratio` is one of 8, 16, 32, 64.
    pub fn new(ratio: u32) -> Result<Self> {
        if SUPPORTED_RATIOS.contains(&ratio) {
            Ok(Self(ratio))
        } else {
            Err(Error::InvalidConfiguration(format!(
                "compression ratio {ratio} is not one of {SUPPORTED_RATIOS:?}"
            )))
        }
    }

    /// The raw ratio.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Size of the funnel output in bytes.
    pub const fn output_size(self) -> usize {
        MESSAGE_SIZE / self.0 as usize
    }
}

impl Default for CompressionRatio {
    fn default() -> Self {
        Self::R8
    }
}

impl TryFrom<u32> for CompressionRatio {
    type Error = Error;

    fn try_from(ratio: u32) -> Result<Self> {
        Self::new(ratio)
    }
}

/// Pre-fold mixing applied by the funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MixStrategy {
    /// Fold the raw page. No cipher involved.
    #[default]
    XorFold,
    /// One keyed AES round per 16-byte unit (Davies–Meyer) before folding.
    BlockMix,
}

impl MixStrategy {
    /// Canonical name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::XorFold => "xor-fold",
            Self::BlockMix => "block-mix",
        }
    }
}

impl fmt::Display for MixStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MixStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "xor-fold" | "xor_fold" => Ok(Self::XorFold),
            "block-mix" | "single_round_block_mix" => Ok(Self::BlockMix),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown mix strategy '{other}'"
            ))),
        }
    }
}

/// Output width of a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestWidth {
    /// First 16 bytes of the 256-bit digest.
    Bits128,
    /// Full 32-byte digest.
    #[default]
    Bits256,
}

impl DigestWidth {
    /// Width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Bits128 => SHORT_DIGEST_SIZE,
            Self::Bits256 => DIGEST_SIZE,
        }
    }

    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits128 => 128,
            Self::Bits256 => 256,
        }
    }
}

impl TryFrom<u32> for DigestWidth {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(Self::Bits128),
            256 => Ok(Self::Bits256),
            other => Err(Error::InvalidConfiguration(format!(
                "digest width {other} is not 128 or 256"
            ))),
        }
    }
}

/// Everything that affects a digest besides the page itself and the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Config {
    /// Funnel compression ratio.
    pub ratio: CompressionRatio,
    /// Funnel mixing strategy.
    pub mix: MixStrategy,
    /// Output width.
    pub width: DigestWidth,
}

impl Config {
    /// Build a configuration from raw values, validating each.
    ///
    /// # Errors
    /// `InvalidConfiguration` for an unsupported ratio or width.
    pub fn new(ratio: u32, mix: MixStrategy, width_bits: u32) -> Result<Self> {
        Ok(Self {
            ratio: CompressionRatio::new(ratio)?,
            mix,
            width: DigestWidth::try_from(width_bits)?,
        })
    }
}

// =============================================================================
// KEYS & DIGESTS
// =============================================================================

/// Round key for the block-mix strategy. Public and non-secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FunnelKey([u8; VEC_SIZE]);

impl FunnelKey {
    /// Wrap a caller-supplied round key.
    pub const fn new(key: [u8; VEC_SIZE]) -> Self {
        Self(key)
    }

    /// Raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; VEC_SIZE] {
        &self.0
    }
}

impl Default for FunnelKey {
    fn default() -> Self {
        Self(crate::kernels::constants::DEFAULT_ROUND_KEY)
    }
}

impl fmt::Debug for FunnelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FunnelKey").field(&"..").finish()
    }
}

/// A 128- or 256-bit digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digest {
    /// Truncated digest.
    Short([u8; SHORT_DIGEST_SIZE]),
    /// Full digest.
    Full([u8; DIGEST_SIZE]),
}

impl Digest {
    /// Truncate or keep a full digest according to `width`.
    pub(crate) fn from_full(full: [u8; DIGEST_SIZE], width: DigestWidth) -> Self {
        match width {
            DigestWidth::Bits256 => Self::Full(full),
            DigestWidth::Bits128 => {
                let mut short = [0u8; SHORT_DIGEST_SIZE];
                short.copy_from_slice(&full[..SHORT_DIGEST_SIZE]);
                Self::Short(short)
            }
        }
    }

    /// Digest bytes (16 or 32).
    pub const fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Short(b) => b,
            Self::Full(b) => b,
        }
    }

    /// Width of this digest.
    pub const fn width(&self) -> DigestWidth {
        match self {
            Self::Short(_) => DigestWidth::Bits128,
            Self::Full(_) => DigestWidth::Bits256,
        }
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_validation() {
        for ratio in [8, 16, 32, 64] {
            assert_eq!(CompressionRatio::new(ratio).map(CompressionRatio::get).ok(), Some(ratio));
        }
        for ratio in [0, 1, 2, 4, 7, 12, 128, 4096] {
            assert!(matches!(
                CompressionRatio::new(ratio),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_width_and_mix_parsing() {
        assert!(matches!(DigestWidth::try_from(128), Ok(DigestWidth::Bits128)));
        assert!(matches!(DigestWidth::try_from(256), Ok(DigestWidth::Bits256)));
        assert!(DigestWidth::try_from(160).is_err());
        assert!(matches!("block-mix".parse(), Ok(MixStrategy::BlockMix)));
        assert!(matches!("xor_fold".parse(), Ok(MixStrategy::XorFold)));
        assert!("aes".parse::<MixStrategy>().is_err());
    }

    #[test]
    fn test_digest_truncation() {
        let mut full = [0u8; DIGEST_SIZE];
        for (i, b) in full.iter_mut().enumerate() {
            *b = i as u8;
        }
        let short = Digest::from_full(full, DigestWidth::Bits128);
        assert_eq!(short.as_bytes(), &full[..16]);
        assert_eq!(short.width(), DigestWidth::Bits128);
    }
}
