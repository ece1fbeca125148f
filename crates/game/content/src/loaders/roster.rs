//! Enemy and trap roster loaders.
//!
//! Roster files list templates to add to or replace in the built-in rosters,
//! so a data file only needs the entries it changes.

use std::path::Path;

use game_core::{EnemyRoster, EnemyTemplate, TrapRoster, TrapTemplate};

use crate::loaders::{LoadResult, read_file};

/// Loader for `enemies.ron` and `traps.ron`.
///
/// RON format: a list of templates. Omitted fields take the template
/// defaults.
pub struct RosterLoader;

impl RosterLoader {
    /// Built-in enemies overlaid with the templates in `path`.
    pub fn load_enemies(path: &Path) -> LoadResult<EnemyRoster> {
        let content = read_file(path)?;
        Self::parse_enemies(&content)
    }

    pub fn parse_enemies(content: &str) -> LoadResult<EnemyRoster> {
        let templates: Vec<EnemyTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy roster RON: {}", e))?;

        let mut roster = EnemyRoster::standard();
        for template in templates {
            if template.kind.trim().is_empty() {
                anyhow::bail!("Enemy template without a kind");
            }
            roster.insert(template);
        }
        Ok(roster)
    }

    /// Built-in traps overlaid with the templates in `path`.
    pub fn load_traps(path: &Path) -> LoadResult<TrapRoster> {
        let content = read_file(path)?;
        Self::parse_traps(&content)
    }

    pub fn parse_traps(content: &str) -> LoadResult<TrapRoster> {
        let templates: Vec<TrapTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse trap roster RON: {}", e))?;

        let mut roster = TrapRoster::standard();
        for template in templates {
            roster.insert(template);
        }
        Ok(roster)
    }
}
