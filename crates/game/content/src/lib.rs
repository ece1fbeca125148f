//! Data-driven content for the dungeon and the loaders that read it.
//!
//! This crate turns RON/TOML data files into `game-core` values:
//! - Game configuration (TOML)
//! - Enemy and trap rosters (RON), layered over the built-in rosters
//! - Dungeon layouts (RON descriptors)
//!
//! Content is read once at startup and handed to the core by value; nothing
//! here touches a live dungeon.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LayoutLoader, LoadResult, RosterLoader};
