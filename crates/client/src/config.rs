//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use game_core::PlayerClass;

/// Headless client configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Content directory; the bundled data is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Layout file name under `layouts/`, without extension.
    pub layout: String,
    pub class: PlayerClass,
    pub max_rounds: u32,
    /// Replaces the seed from `config.toml`.
    pub seed: Option<u64>,
    /// Directory for per-session log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
    pub frame: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            layout: String::from("crypt"),
            class: PlayerClass::Warrior,
            max_rounds: 200,
            seed: None,
            log_dir: None,
            frame: Duration::from_millis(50),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUNGEON_CONTENT_DIR` - Content directory (default: bundled data)
    /// - `DUNGEON_LAYOUT` - Layout name (default: crypt)
    /// - `DUNGEON_CLASS` - warrior, mage or rogue (default: warrior)
    /// - `DUNGEON_MAX_ROUNDS` - Round limit (default: 200)
    /// - `DUNGEON_SEED` - Seed override
    /// - `DUNGEON_LOG_DIR` - Log file directory
    /// - `DUNGEON_FRAME_MS` - Tick length in milliseconds (default: 50)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    /// Unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = read("DUNGEON_CONTENT_DIR") {
            config.content_dir = Some(PathBuf::from(dir));
        }
        if let Some(layout) = read("DUNGEON_LAYOUT") {
            config.layout = layout.trim().to_owned();
        }
        if let Some(class) = parse(read("DUNGEON_CLASS")) {
            config.class = class;
        }
        if let Some(rounds) = parse::<u32>(read("DUNGEON_MAX_ROUNDS")) {
            config.max_rounds = rounds.max(1);
        }
        config.seed = parse(read("DUNGEON_SEED"));
        if let Some(dir) = read("DUNGEON_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(ms) = parse::<u64>(read("DUNGEON_FRAME_MS")) {
            config.frame = Duration::from_millis(ms.max(1));
        }

        config
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), ClientConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let c = config(&[
            ("DUNGEON_CONTENT_DIR", "/srv/content"),
            ("DUNGEON_LAYOUT", "vault"),
            ("DUNGEON_CLASS", "Mage"),
            ("DUNGEON_MAX_ROUNDS", "12"),
            ("DUNGEON_SEED", "99"),
            ("DUNGEON_LOG_DIR", "/tmp/logs"),
            ("DUNGEON_FRAME_MS", "16"),
        ]);
        assert_eq!(c.content_dir, Some(PathBuf::from("/srv/content")));
        assert_eq!(c.layout, "vault");
        assert_eq!(c.class, PlayerClass::Mage);
        assert_eq!(c.max_rounds, 12);
        assert_eq!(c.seed, Some(99));
        assert_eq!(c.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(c.frame, Duration::from_millis(16));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let c = config(&[
            ("DUNGEON_CLASS", "paladin"),
            ("DUNGEON_MAX_ROUNDS", "0"),
            ("DUNGEON_SEED", "abc"),
            ("DUNGEON_LAYOUT", "  "),
        ]);
        assert_eq!(c.class, PlayerClass::Warrior);
        assert_eq!(c.max_rounds, 1);
        assert_eq!(c.seed, None);
        assert_eq!(c.layout, "crypt");
    }
}
