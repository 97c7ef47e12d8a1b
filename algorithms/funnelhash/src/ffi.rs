//! C-API Bindings
//!
//! Exposes funnelhash to C/C++ via FFI with pointer checks and panic boundaries.

#![allow(unsafe_code)]

use std::panic::{self, AssertUnwindSafe};
use std::slice;
use std::sync::OnceLock;

use crate::context::FunnelContext;
use crate::engine::parallel;
use crate::kernels::constants::{DIGEST_SIZE, SHORT_DIGEST_SIZE};
use crate::oneshot;
use crate::types::{CompressionRatio, Config, DigestWidth, Error, MixStrategy};

// =============================================================================
// STATUS CODES
// =============================================================================

/// Success.
pub const FUNNELHASH_OK: i32 = 0;
/// A required pointer was null.
pub const FUNNELHASH_ERR_NULL: i32 = -1;
/// A panic was caught at the boundary.
pub const FUNNELHASH_ERR_PANIC: i32 = -2;
/// Input length was not a whole number of 4096-byte pages.
pub const FUNNELHASH_ERR_LENGTH: i32 = -3;
/// Unsupported ratio, mix strategy or width.
pub const FUNNELHASH_ERR_CONFIG: i32 = -4;
/// A worker thread could not be spawned.
pub const FUNNELHASH_ERR_WORKER: i32 = -5;

/// Mix strategy selectors for `funnelhash_dispatch`.
pub const FUNNELHASH_MIX_XOR_FOLD: u32 = 0;
/// See `FUNNELHASH_MIX_XOR_FOLD`.
pub const FUNNELHASH_MIX_BLOCK_MIX: u32 = 1;

const fn status(err: &Error) -> i32 {
    match err {
        Error::InvalidInputLength { .. } => FUNNELHASH_ERR_LENGTH,
        Error::InvalidConfiguration(_) => FUNNELHASH_ERR_CONFIG,
        Error::WorkerCreationFailure { .. } => FUNNELHASH_ERR_WORKER,
    }
}

fn guarded(f: impl FnOnce() -> i32) -> i32 {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or(FUNNELHASH_ERR_PANIC)
}

// =============================================================================
// ONE-SHOT API
// =============================================================================

/// Compute the 256-bit digest of one 4096-byte page.
///
/// # Safety
/// - `input_ptr` must be valid for `input_len` bytes
/// - `output_ptr` must be valid for 32 writable bytes
///
/// # Returns
/// `0` on success, `-1` null pointer, `-2` panic, `-3` wrong length.
#[no_mangle]
pub unsafe extern "C" fn funnelhash_digest256(
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
) -> i32 {
    if input_ptr.is_null() || output_ptr.is_null() {
        return FUNNELHASH_ERR_NULL;
    }

    guarded(|| {
        let input = slice::from_raw_parts(input_ptr, input_len);
        match oneshot::digest256(input) {
            Ok(digest) => {
                std::ptr::copy_nonoverlapping(digest.as_ptr(), output_ptr, DIGEST_SIZE);
                FUNNELHASH_OK
            }
            Err(e) => status(&e),
        }
    })
}

/// Compute the 128-bit digest of one 4096-byte page.
///
/// # Safety
/// - `input_ptr` must be valid for `input_len` bytes
/// - `output_ptr` must be valid for 16 writable bytes
///
/// # Returns
/// `0` on success, `-1` null pointer, `-2` panic, `-3` wrong length.
#[no_mangle]
pub unsafe extern "C" fn funnelhash_digest128(
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
) -> i32 {
    if input_ptr.is_null() || output_ptr.is_null() {
        return FUNNELHASH_ERR_NULL;
    }

    guarded(|| {
        let input = slice::from_raw_parts(input_ptr, input_len);
        match oneshot::digest128(input) {
            Ok(digest) => {
                std::ptr::copy_nonoverlapping(digest.as_ptr(), output_ptr, SHORT_DIGEST_SIZE);
                FUNNELHASH_OK
            }
            Err(e) => status(&e),
        }
    })
}

// =============================================================================
// BATCH API
// =============================================================================

/// Hash `input_len / 4096` pages on up to `workers` threads.
///
/// Digests are written back to back, `width_bits / 8` bytes each. Nothing is
/// written unless the whole batch succeeds.
///
/// # Safety
/// - `input_ptr` must be valid for `input_len` bytes
/// - `output_ptr` must be valid for `(input_len / 4096) * width_bits / 8` writable bytes
///
/// # Returns
/// `0` on success, or one of the negative `FUNNELHASH_ERR_*` codes.
#[no_mangle]
pub unsafe extern "C" fn funnelhash_dispatch(
    input_ptr: *const u8,
    input_len: usize,
    output_ptr: *mut u8,
    workers: usize,
    ratio: u32,
    mix: u32,
    width_bits: u32,
) -> i32 {
    if input_ptr.is_null() || output_ptr.is_null() {
        return FUNNELHASH_ERR_NULL;
    }

    guarded(|| {
        let mix = match mix {
            FUNNELHASH_MIX_XOR_FOLD => MixStrategy::XorFold,
            FUNNELHASH_MIX_BLOCK_MIX => MixStrategy::BlockMix,
            _ => return FUNNELHASH_ERR_CONFIG,
        };
        let config = match (CompressionRatio::new(ratio), DigestWidth::try_from(width_bits)) {
            (Ok(ratio), Ok(width)) => Config { ratio, mix, width },
            (Err(e), _) | (_, Err(e)) => return status(&e),
        };

        let input = slice::from_raw_parts(input_ptr, input_len);
        match parallel::dispatch(shared_context(), &config, input, workers) {
            Ok(digests) => {
                let width = config.width.bytes();
                let out = slice::from_raw_parts_mut(output_ptr, digests.len() * width);
                for (dst, digest) in out.chunks_exact_mut(width).zip(&digests) {
                    dst.copy_from_slice(digest.as_bytes());
                }
                FUNNELHASH_OK
            }
            Err(e) => status(&e),
        }
    })
}

/// Default-keyed context, built on first use and shared by all C callers.
fn shared_context() -> &'static FunnelContext {
    static CONTEXT: OnceLock<FunnelContext> = OnceLock::new();
    CONTEXT.get_or_init(FunnelContext::default)
}
