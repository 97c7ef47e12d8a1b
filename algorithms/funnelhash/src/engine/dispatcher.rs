//! Hardware Dispatcher
//!
//! Selects the fastest available block mixer (AES-NI, ARMv8 AES, or portable)
//! for the current CPU. Selection happens once, when a `FunnelContext` is
//! built; the hot path only calls through the stored function pointer.

use crate::kernels;
use crate::kernels::constants::{MESSAGE_SIZE, VEC_SIZE};
use crate::types::MixFn;

/// A selected mixer together with its display name.
#[derive(Clone, Copy)]
pub struct Backend {
    /// Mixer entry point.
    pub mix: MixFn,
    /// Human-readable backend name.
    pub name: &'static str,
}

/// Software fallback, always available.
pub const PORTABLE: Backend = Backend {
    mix: kernels::portable::mix_blocks,
    name: "Portable",
};

// =============================================================================
// DISPATCHER
// =============================================================================

/// Returns the fastest mixer for this CPU.
#[must_use]
pub fn best_backend() -> Backend {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("aes") && is_x86_feature_detected!("sse2") {
            return Backend {
                mix: safe_aesni_wrapper,
                name: "AES-NI",
            };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("aes") {
            return Backend {
                mix: safe_neon_wrapper,
                name: "ARMv8 AES",
            };
        }
    }

    PORTABLE
}

/// Returns the name of the mixer `best_backend` would select.
#[must_use]
pub fn active_backend_name() -> &'static str {
    best_backend().name
}

// =============================================================================
// WRAPPERS
// =============================================================================

/// AES-NI wrapper
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[inline]
#[allow(unsafe_code)]
fn safe_aesni_wrapper(
    src: &[u8; MESSAGE_SIZE],
    key: &[u8; VEC_SIZE],
    out: &mut [u8; MESSAGE_SIZE],
) {
    // SAFETY: Only reachable after CPUID validation (AES/SSE2).
    unsafe { kernels::aesni::mix_blocks(src, key, out) }
}

/// ARMv8 AES wrapper
#[cfg(target_arch = "aarch64")]
#[inline]
#[allow(unsafe_code)]
fn safe_neon_wrapper(src: &[u8; MESSAGE_SIZE], key: &[u8; VEC_SIZE], out: &mut [u8; MESSAGE_SIZE]) {
    // SAFETY: Only reachable after runtime detection of the `aes` feature.
    unsafe { kernels::neon::mix_blocks(src, key, out) }
}
