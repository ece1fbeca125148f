//! Content loaders for reading game data from files.
//!
//! Every loader has a `load(path)` entry point that reads the file and a
//! `parse(text)` twin for data that is already in memory.

pub mod config;
pub mod factory;
pub mod layout;
pub mod roster;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use layout::LayoutLoader;
pub use roster::RosterLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
