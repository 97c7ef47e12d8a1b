//! CLI Commands
//!
//! All funnelhash CLI commands organized as separate modules.

mod bench;
mod check;
mod hash;

pub use bench::bench;
pub use check::check_mode;
pub use hash::{hash_files, MixArg};
