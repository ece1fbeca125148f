//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing keys fall back to [`GameConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.width <= 0 || config.height <= 0 {
            anyhow::bail!(
                "Board dimensions must be positive, got {}x{}",
                config.width,
                config.height
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("width = 12\nseed = 9\n").unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.seed, 9);
        assert_eq!(config.height, GameConfig::DEFAULT_HEIGHT);
        assert_eq!(config.move_delay, GameConfig::DEFAULT_MOVE_DELAY);
    }

    #[test]
    fn rejects_empty_board() {
        assert!(ConfigLoader::parse("width = 0").is_err());
    }

    #[test]
    fn reports_syntax_errors() {
        let err = ConfigLoader::parse("width = ").unwrap_err();
        assert!(err.to_string().contains("config TOML"));
    }
}
