//! Funnelhash CLI
//!
//! Page-digest command-line tool.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use commands::{bench, check_mode, hash_files, MixArg};
use funnelhash::{Config, FunnelContext};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CLI DEFINITION
// =============================================================================

#[derive(Parser)]
#[command(name = "funnelhash")]
#[command(about = "Entropy-funnel + SM3 digests for 4 KiB pages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    digest: DigestArgs,

    /// Worker threads for batch hashing
    #[arg(short, long, global = true, default_value_t = num_threads())]
    threads: usize,
}

#[derive(Args)]
struct DigestArgs {
    /// Funnel compression ratio (8, 16, 32 or 64)
    #[arg(short, long, global = true, default_value_t = 8)]
    ratio: u32,

    /// Funnel mixing strategy
    #[arg(short, long, global = true, value_enum, default_value_t = MixArg::XorFold)]
    mix: MixArg,

    /// Digest width in bits (128 or 256)
    #[arg(short, long, global = true, default_value_t = 256)]
    width: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one digest per 4096-byte page of each file
    Hash {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Verify page digests from a listing (like sha256sum -c)
    Check {
        #[arg(value_name = "FILE")]
        checksum_file: PathBuf,
    },
    /// Quick throughput comparison against SHA-256 and plain SM3
    Bench {
        /// Number of pages per run
        #[arg(short, long, default_value_t = 4096)]
        pages: usize,
    },
}

fn num_threads() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("FUNNELHASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new(cli.digest.ratio, cli.digest.mix.into(), cli.digest.width)?;
    let ctx = FunnelContext::default();
    tracing::debug!(?config, backend = ctx.backend_name(), threads = cli.threads, "starting");

    match &cli.command {
        Commands::Hash { files } => hash_files(&ctx, &config, files, cli.threads)?,
        Commands::Check { checksum_file } => check_mode(&ctx, &config, checksum_file)?,
        Commands::Bench { pages } => bench(&ctx, &config, *pages, cli.threads)?,
    }

    Ok(())
}
