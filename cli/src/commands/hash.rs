//! Hash Command
//!
//! Page-by-page file digests. Files are read in parallel via Rayon; the pages
//! of each file go through the funnelhash batch dispatcher with unpinned
//! workers, since several dispatches run at once.

use anyhow::{Context, Result};
use clap::ValueEnum;
use funnelhash::{Config, Digest, DispatchOptions, FunnelContext, MixStrategy, MESSAGE_SIZE};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum MixArg {
    /// Weighted fold of the raw page (no cipher)
    XorFold,
    /// One keyed AES round per 16-byte unit before folding
    BlockMix,
}

impl From<MixArg> for MixStrategy {
    fn from(arg: MixArg) -> Self {
        match arg {
            MixArg::XorFold => Self::XorFold,
            MixArg::BlockMix => Self::BlockMix,
        }
    }
}

/// Read a file as whole pages, zero-padding the last partial page.
///
/// An empty file has no pages.
pub fn read_pages(path: &Path) -> Result<Vec<u8>> {
    let mut data =
        std::fs::read(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let padded = data.len().div_ceil(MESSAGE_SIZE) * MESSAGE_SIZE;
    data.resize(padded, 0);
    Ok(data)
}

/// Digest every page of one file.
pub fn hash_file(
    ctx: &FunnelContext,
    config: &Config,
    path: &Path,
    threads: usize,
) -> Result<Vec<Digest>> {
    let data = read_pages(path)?;
    let options = DispatchOptions { pin_workers: false };
    funnelhash::dispatch_with(ctx, config, &data, threads, options)
        .with_context(|| format!("Failed to hash: {}", path.display()))
}

/// Hash files and print `<hex>  <file>#<page>` lines in input order.
pub fn hash_files(
    ctx: &FunnelContext,
    config: &Config,
    files: &[PathBuf],
    threads: usize,
) -> Result<()> {
    let results: Vec<_> = files
        .par_iter()
        .map(|path| (path, hash_file(ctx, config, path, threads)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(digests) => {
                for (page, digest) in digests.iter().enumerate() {
                    println!("{}  {}#{page}", hex::encode(digest), path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("Failed to hash {failed} file(s)");
    }

    Ok(())
}
