//! Check Command
//!
//! Verify page digests from a listing (like sha256sum -c).

use anyhow::{Context, Result};
use funnelhash::{Config, DigestWidth, FunnelContext, MESSAGE_SIZE};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::hash::read_pages;

// =============================================================================
// CHECK
// =============================================================================

/// Split `file#page` at the last `#`.
fn parse_target(target: &str) -> Option<(&str, usize)> {
    let (file, page) = target.rsplit_once('#')?;
    Some((file, page.parse().ok()?))
}

/// Verify page digests from a checksum listing.
///
/// The digest width of each line follows its hex length; ratio and mix come
/// from the command line.
pub fn check_mode(ctx: &FunnelContext, config: &Config, checksum_file: &Path) -> Result<()> {
    let file = File::open(checksum_file)
        .with_context(|| format!("Failed to open: {}", checksum_file.display()))?;

    let reader = BufReader::new(file);
    let mut cache: HashMap<PathBuf, Vec<u8>> = HashMap::new();
    let mut total = 0;
    let mut failed = 0;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Format: "hash  file#page" (two spaces)
        let Some((expected, target)) = line.split_once("  ") else {
            eprintln!("Warning: Invalid format: {line}");
            continue;
        };
        let Some((file_path, page)) = parse_target(target.trim()) else {
            eprintln!("Warning: Invalid page reference: {target}");
            continue;
        };
        let width = match expected.trim().len() {
            32 => DigestWidth::Bits128,
            64 => DigestWidth::Bits256,
            _ => {
                eprintln!("Warning: Invalid digest length: {line}");
                continue;
            }
        };
        total += 1;

        let path = PathBuf::from(file_path);
        if !cache.contains_key(&path) {
            match read_pages(&path) {
                Ok(data) => {
                    cache.insert(path.clone(), data);
                }
                Err(e) => {
                    println!("{target}: FAILED ({e:#})");
                    failed += 1;
                    continue;
                }
            }
        }
        let data = &cache[&path];

        let Some(bytes) = data.chunks_exact(MESSAGE_SIZE).nth(page) else {
            println!("{target}: FAILED (no such page)");
            failed += 1;
            continue;
        };

        let page_config = Config { width, ..*config };
        let actual = funnelhash::digest_with(ctx, &page_config, bytes)?;

        if hex::encode(actual) == expected.trim() {
            println!("{target}: OK");
        } else {
            println!("{target}: FAILED");
            failed += 1;
        }
    }

    println!();
    if failed == 0 {
        println!("All {total} page digests verified");
    } else {
        eprintln!("WARNING: {failed} of {total} page digests did NOT match");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_target;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("a.bin#3"), Some(("a.bin", 3)));
        assert_eq!(parse_target("dir/x#y.bin#0"), Some(("dir/x#y.bin", 0)));
        assert_eq!(parse_target("a.bin"), None);
        assert_eq!(parse_target("a.bin#x"), None);
    }
}
