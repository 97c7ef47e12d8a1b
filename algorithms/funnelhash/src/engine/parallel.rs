//! Parallel Batch Dispatcher
//!
//! Splits `N` independent pages into contiguous, index-preserving ranges and
//! hashes each range on its own OS thread:
//! 1. Clamp the worker count to the logical CPUs (and to `N`)
//! 2. Spawn one scoped thread per range, optionally pinned to a core
//! 3. Each worker writes only into its disjoint slice of the output
//! 4. Join once; any spawn failure discards the whole batch

#[cfg(test)]
use std::cell::Cell;
use std::thread;

use crate::context::FunnelContext;
use crate::kernels::constants::MESSAGE_SIZE;
use crate::oneshot::digest_page;
use crate::types::{Config, Digest, Error, Result};

// =============================================================================
// OPTIONS
// =============================================================================

/// Knobs that affect scheduling but never the digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Pin worker `i` to logical CPU `i`. Pinning failures are logged and ignored.
    pub pin_workers: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self { pin_workers: true }
    }
}

// =============================================================================
// PUBLIC ENTRY POINTS
// =============================================================================

/// Hash a flat buffer of `N × 4096` bytes on up to `worker_count` threads.
///
/// Slot `i` of the result is always the digest of page `i`.
///
/// # Errors
/// - `InvalidInputLength` if `messages.len()` is not a multiple of 4096
///   (`actual` carries the length of the trailing fragment).
/// - `WorkerCreationFailure` if any worker thread cannot be spawned.
pub fn dispatch(
    ctx: &FunnelContext,
    config: &Config,
    messages: &[u8],
    worker_count: usize,
) -> Result<Vec<Digest>> {
    dispatch_with(ctx, config, messages, worker_count, DispatchOptions::default())
}

/// Same as [`dispatch`], with explicit scheduling options.
///
/// # Errors
/// See [`dispatch`].
pub fn dispatch_with(
    ctx: &FunnelContext,
    config: &Config,
    messages: &[u8],
    worker_count: usize,
    options: DispatchOptions,
) -> Result<Vec<Digest>> {
    let (pages, rest) = messages.as_chunks::<MESSAGE_SIZE>();
    if !rest.is_empty() {
        return Err(Error::InvalidInputLength {
            expected: MESSAGE_SIZE,
            actual: rest.len(),
        });
    }
    dispatch_pages_with(ctx, config, pages, worker_count, options)
}

/// Hash already page-shaped input on up to `worker_count` threads.
///
/// # Errors
/// `WorkerCreationFailure` if any worker thread cannot be spawned.
pub fn dispatch_pages(
    ctx: &FunnelContext,
    config: &Config,
    pages: &[[u8; MESSAGE_SIZE]],
    worker_count: usize,
) -> Result<Vec<Digest>> {
    dispatch_pages_with(ctx, config, pages, worker_count, DispatchOptions::default())
}

/// Same as [`dispatch_pages`], with explicit scheduling options.
///
/// # Errors
/// `WorkerCreationFailure` if any worker thread cannot be spawned.
#[tracing::instrument(
    skip_all,
    level = "debug",
    fields(messages = pages.len(), workers = worker_count, width = config.width.bits())
)]
pub fn dispatch_pages_with(
    ctx: &FunnelContext,
    config: &Config,
    pages: &[[u8; MESSAGE_SIZE]],
    worker_count: usize,
    options: DispatchOptions,
) -> Result<Vec<Digest>> {
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let workers = effective_workers(worker_count, pages.len());
    let placeholder = Digest::from_full([0u8; 32], config.width);
    let mut out = vec![placeholder; pages.len()];
    let cores = core_ids(options.pin_workers);
    let config = *config;

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::with_capacity(workers);
        let mut rest_in = pages;
        let mut rest_out = out.as_mut_slice();

        for (worker, len) in partition(pages.len(), workers).enumerate() {
            let (input, in_tail) = rest_in.split_at(len);
            let (output, out_tail) = core::mem::take(&mut rest_out).split_at_mut(len);
            rest_in = in_tail;
            rest_out = out_tail;

            let core = cores.as_ref().and_then(|c| c.get(worker % c.len()).copied());
            let handle = spawn_worker(scope, worker, move || {
                pin_current(worker, core);
                for (page, slot) in input.iter().zip(output.iter_mut()) {
                    *slot = digest_page(ctx, &config, page);
                }
            })
            .map_err(|source| Error::WorkerCreationFailure { worker, source })?;
            handles.push(handle);
        }

        for handle in handles {
            if let Err(payload) = handle.join() {
                std::panic::resume_unwind(payload);
            }
        }
        Ok(())
    })?;

    Ok(out)
}

#[cfg(test)]
thread_local! {
    /// Worker index whose spawn fails on this dispatching thread.
    static FAIL_SPAWN_AT: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Start one named worker inside `scope`.
fn spawn_worker<'scope, 'env, F>(
    scope: &'scope thread::Scope<'scope, 'env>,
    worker: usize,
    body: F,
) -> std::io::Result<thread::ScopedJoinHandle<'scope, ()>>
where
    F: FnOnce() + Send + 'scope,
{
    #[cfg(test)]
    if FAIL_SPAWN_AT.with(Cell::get) == Some(worker) {
        return Err(std::io::Error::other("spawn refused"));
    }

    thread::Builder::new()
        .name(format!("funnelhash-worker-{worker}"))
        .spawn_scoped(scope, body)
}

// =============================================================================
// PARTITIONING
// =============================================================================

/// Clamp the requested worker count to `[1, min(cpus, messages)]`.
fn effective_workers(requested: usize, messages: usize) -> usize {
    requested.min(num_cpus::get()).min(messages).max(1)
}

/// Range lengths: `n / workers` each, the last worker takes the remainder.
fn partition(n: usize, workers: usize) -> impl Iterator<Item = usize> {
    let per = n / workers;
    (0..workers).map(move |w| {
        if w + 1 == workers {
            n - per * (workers - 1)
        } else {
            per
        }
    })
}

// =============================================================================
// AFFINITY
// =============================================================================

#[cfg(feature = "affinity")]
type CoreId = core_affinity::CoreId;
#[cfg(not(feature = "affinity"))]
type CoreId = usize;

#[cfg(feature = "affinity")]
fn core_ids(pin: bool) -> Option<Vec<CoreId>> {
    if !pin {
        return None;
    }
    let ids = core_affinity::get_core_ids().filter(|ids| !ids.is_empty());
    if ids.is_none() {
        tracing::warn!("cannot enumerate CPU cores, workers run unpinned");
    }
    ids
}

#[cfg(not(feature = "affinity"))]
const fn core_ids(_pin: bool) -> Option<Vec<CoreId>> {
    None
}

/// Best-effort pinning of the calling worker thread.
#[cfg(feature = "affinity")]
fn pin_current(worker: usize, core: Option<CoreId>) {
    if let Some(core) = core {
        if !core_affinity::set_for_current(core) {
            tracing::warn!(worker, cpu = core.id, "affinity pinning failed, continuing unpinned");
        }
    }
}

#[cfg(not(feature = "affinity"))]
const fn pin_current(_worker: usize, _core: Option<CoreId>) {}
