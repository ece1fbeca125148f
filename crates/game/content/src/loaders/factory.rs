//! Content factory for loading everything a session needs from one directory.

use std::path::{Path, PathBuf};

use game_core::{DungeonDescriptor, EnemyRoster, GameConfig, TrapRoster};

use crate::loaders::{ConfigLoader, LayoutLoader, LoadResult, RosterLoader};

/// Content factory that loads game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── enemies.ron
/// ├── traps.ron
/// └── layouts/
///     └── crypt.ron
/// ```
///
/// `config.toml`, `enemies.ron` and `traps.ron` are optional; the built-in
/// defaults are used when a file is absent.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the enemy roster from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyRoster> {
        let path = self.data_dir.join("enemies.ron");
        if !path.exists() {
            return Ok(EnemyRoster::standard());
        }
        RosterLoader::load_enemies(&path)
    }

    /// Load the trap roster from `traps.ron`.
    pub fn load_traps(&self) -> LoadResult<TrapRoster> {
        let path = self.data_dir.join("traps.ron");
        if !path.exists() {
            return Ok(TrapRoster::standard());
        }
        RosterLoader::load_traps(&path)
    }

    /// Load a layout from `layouts/{name}.ron`.
    pub fn load_layout(&self, name: &str) -> LoadResult<DungeonDescriptor> {
        let path = self.data_dir.join("layouts").join(format!("{}.ron", name));
        LayoutLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
