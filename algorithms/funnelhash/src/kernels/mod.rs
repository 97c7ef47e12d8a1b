//! Compute Kernels
//!
//! Pure building blocks: the SM3 compression function, the funnel fold and the
//! single-round block mixers (portable and hardware).

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod aesni;
pub mod constants;
pub mod funnel;
#[cfg(target_arch = "aarch64")]
pub mod neon;
pub mod portable;
pub mod sm3;
