//! Funnel Context
//!
//! Immutable, explicitly constructed state for the funnel stage: the round key
//! and the block mixer chosen for this CPU. Build one up front and share it by
//! reference across every worker; it is `Copy + Send + Sync`.

use crate::engine::dispatcher::{self, Backend};
use crate::kernels::constants::MESSAGE_SIZE;
use crate::kernels::funnel::{self, FunnelBuffer};
use crate::types::{CompressionRatio, FunnelKey, MixStrategy};

/// Round key plus the selected mixer backend.
#[derive(Clone, Copy)]
pub struct FunnelContext {
    key: FunnelKey,
    backend: Backend,
}

impl FunnelContext {
    /// Probe the CPU once and bind `key` to the fastest mixer.
    pub fn new(key: FunnelKey) -> Self {
        let backend = dispatcher::best_backend();
        tracing::debug!(backend = backend.name, "funnel mixer selected");
        Self { key, backend }
    }

    /// Force the portable software mixer (reference for backend comparisons).
    pub const fn portable(key: FunnelKey) -> Self {
        Self {
            key,
            backend: dispatcher::PORTABLE,
        }
    }

    /// Name of the mixer backend in use.
    pub const fn backend_name(&self) -> &'static str {
        self.backend.name
    }

    /// Round key used by the block-mix strategy.
    pub const fn key(&self) -> &FunnelKey {
        &self.key
    }

    /// Reduce one page to `4096 / ratio` bytes.
    #[must_use]
    pub fn funnel(
        &self,
        page: &[u8; MESSAGE_SIZE],
        ratio: CompressionRatio,
        mix: MixStrategy,
    ) -> FunnelBuffer {
        let ratio = ratio.get() as usize;
        match mix {
            MixStrategy::XorFold => funnel::fold(page, ratio),
            MixStrategy::BlockMix => {
                let mut mixed = [0u8; MESSAGE_SIZE];
                (self.backend.mix)(page, self.key.as_bytes(), &mut mixed);
                funnel::fold(&mixed, ratio)
            }
        }
    }
}

impl Default for FunnelContext {
    fn default() -> Self {
        Self::new(FunnelKey::default())
    }
}

impl core::fmt::Debug for FunnelContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunnelContext")
            .field("key", &self.key)
            .field("backend", &self.backend.name)
            .finish()
    }
}
