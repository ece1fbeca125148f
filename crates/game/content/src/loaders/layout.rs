//! Dungeon layout loader.
//!
//! A layout is a [`DungeonDescriptor`] in RON: tile rows, spawn and exit,
//! shared waypoints, enemies and traps by kind, and an optional script.

use std::path::Path;

use game_core::{Dungeon, DungeonDescriptor, EnemyRoster, GameConfig, TrapRoster};

use crate::loaders::{LoadResult, read_file};

/// Loader for layout files under `layouts/`.
pub struct LayoutLoader;

impl LayoutLoader {
    /// Load a layout descriptor from a RON file.
    pub fn load(path: &Path) -> LoadResult<DungeonDescriptor> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load layout {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<DungeonDescriptor> {
        let layout: DungeonDescriptor = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse layout RON: {}", e))?;

        let Some(width) = layout.rows.first().map(|row| row.chars().count()) else {
            anyhow::bail!("Layout has no rows");
        };
        if let Some(row) = layout
            .rows
            .iter()
            .position(|row| row.chars().count() != width)
        {
            anyhow::bail!("Layout row {} is not {} tiles wide", row, width);
        }
        Ok(layout)
    }

    /// Builds a live dungeon from `layout`.
    pub fn build(
        layout: &DungeonDescriptor,
        config: GameConfig,
        enemies: &EnemyRoster,
        traps: &TrapRoster,
    ) -> LoadResult<Dungeon> {
        layout
            .build(config, enemies, traps)
            .map_err(|e| anyhow::anyhow!("Failed to build dungeon from layout: {}", e))
    }
}
