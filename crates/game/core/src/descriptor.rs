//! Minimal descriptors for saving and rebuilding a dungeon.
//!
//! A descriptor keeps only what cannot be derived from a roster: the kind,
//! where the entity stands and what it is called. Everything else comes back
//! from the template when the dungeon is rebuilt.

use crate::actor::Actor;
use crate::config::GameConfig;
use crate::dungeon::Dungeon;
use crate::error::DungeonError;
use crate::grid::Grid;
use crate::roster::{EnemyRoster, TrapRoster};
use crate::trap::{Trap, TrapKind};
use crate::types::{Direction, Position};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDescriptor {
    pub kind: String,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub patrol: Vec<Position>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapDescriptor {
    pub kind: TrapKind,
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    /// Fixed wind direction; rolled on rebuild when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wind: Option<Direction>,
}

/// Everything needed to rebuild a dungeon given the rosters.
///
/// `rows` use one character per tile (see [`TileKind`](crate::grid::TileKind)).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonDescriptor {
    pub rows: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wrap_around: bool,
    pub spawn: Position,
    pub exit: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub waypoints: Vec<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemies: Vec<EnemyDescriptor>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traps: Vec<TrapDescriptor>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub script: Option<String>,
}

impl Actor {
    /// `None` for the player, who is rebuilt from the spawn point.
    pub fn describe(&self) -> Option<EnemyDescriptor> {
        let mind = self.mind()?;
        Some(EnemyDescriptor {
            kind: mind.kind.clone(),
            position: self.position,
            name: Some(self.name.clone()),
            patrol: mind.patrol().to_vec(),
        })
    }
}

impl Trap {
    pub fn describe(&self) -> TrapDescriptor {
        TrapDescriptor {
            kind: self.kind,
            position: self.position,
            name: Some(self.name.clone()),
            wind: self.wind,
        }
    }
}

impl Dungeon {
    /// Descriptor of the board and every live enemy and trap.
    pub fn describe(&self) -> DungeonDescriptor {
        DungeonDescriptor {
            rows: self.grid().rows(),
            wrap_around: self.grid().wraps(),
            spawn: self.spawn(),
            exit: self.exit(),
            waypoints: self.waypoints().to_vec(),
            enemies: self
                .enemies()
                .filter(|a| !a.is_expired())
                .filter_map(Actor::describe)
                .collect(),
            traps: self
                .traps()
                .iter()
                .filter(|t| !t.is_expired())
                .map(Trap::describe)
                .collect(),
            script: self.script().map(str::to_owned),
        }
    }
}

impl DungeonDescriptor {
    /// Rebuilds a live dungeon. The board size in `config` is replaced by the
    /// size of `rows`. No player is installed.
    pub fn build(
        &self,
        config: GameConfig,
        enemies: &EnemyRoster,
        traps: &TrapRoster,
    ) -> Result<Dungeon, DungeonError> {
        let grid = Grid::from_rows(self.rows.as_slice(), self.wrap_around).map_err(|(row, symbol)| {
            DungeonError::InvalidLayout {
                message: format!("unknown tile '{symbol}' in row {row}"),
            }
        })?;
        let mut dungeon = Dungeon::with_grid(config, grid);
        dungeon.set_spawn(self.spawn)?;
        dungeon.set_exit(self.exit)?;
        for waypoint in &self.waypoints {
            dungeon.add_waypoint(*waypoint);
        }

        for enemy in &self.enemies {
            let template = enemies.get(&enemy.kind)?;
            let id = dungeon.place_enemy(enemy.position, template, enemy.name.as_deref())?;
            if !enemy.patrol.is_empty()
                && let Some(mind) = dungeon.actor_mut(id).and_then(Actor::mind_mut)
            {
                mind.set_patrol(enemy.patrol.iter().copied());
            }
        }

        for trap in &self.traps {
            let mut template = traps.get(trap.kind)?.clone();
            if trap.wind.is_some() {
                template.wind = trap.wind;
            }
            dungeon.place_trap(trap.position, &template, trap.name.as_deref())?;
        }

        dungeon.set_script(self.script.clone());
        Ok(dungeon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;

    fn layout() -> DungeonDescriptor {
        DungeonDescriptor {
            rows: vec![
                String::from("......"),
                String::from(".#..~."),
                String::from("......"),
            ],
            wrap_around: false,
            spawn: Position::new(0, 0),
            exit: Position::new(5, 2),
            waypoints: vec![Position::new(3, 0)],
            enemies: vec![
                EnemyDescriptor {
                    kind: String::from("snake"),
                    position: Position::new(2, 2),
                    name: None,
                    patrol: vec![Position::new(3, 0)],
                },
                EnemyDescriptor {
                    kind: String::from("bat"),
                    position: Position::new(4, 1),
                    name: Some(String::from("flappy")),
                    patrol: Vec::new(),
                },
            ],
            traps: vec![TrapDescriptor {
                kind: TrapKind::Wind,
                position: Position::new(3, 2),
                name: None,
                wind: Some(Direction::Up),
            }],
            script: Some(String::from("patrol()")),
        }
    }

    #[test]
    fn rebuilds_board_and_entities() {
        let d = layout()
            .build(
                GameConfig::default(),
                &EnemyRoster::standard(),
                &TrapRoster::standard(),
            )
            .unwrap();
        assert_eq!(d.grid().width(), 6);
        assert_eq!(d.grid().kind(Position::new(1, 1)), TileKind::Wall);
        assert_eq!(d.enemies().count(), 2);
        assert!(d.lookup("snake1").is_some());
        assert!(d.lookup("flappy").is_some());
        let trap = d.lookup("windtrap1").and_then(|id| d.trap(id)).unwrap();
        assert_eq!(trap.wind, Some(Direction::Up));
        assert_eq!(d.script(), Some("patrol()"));
    }

    #[test]
    fn describe_then_build_is_stable() {
        let roster = EnemyRoster::standard();
        let traps = TrapRoster::standard();
        let d = layout().build(GameConfig::default(), &roster, &traps).unwrap();
        let described = d.describe();
        let rebuilt = described
            .build(GameConfig::default(), &roster, &traps)
            .unwrap();
        assert_eq!(rebuilt.describe(), described);
    }

    #[test]
    fn unknown_kind_is_reported() {
        let mut bad = layout();
        bad.enemies[0].kind = String::from("dragon");
        let err = bad
            .build(GameConfig::default(), &EnemyRoster::standard(), &TrapRoster::standard())
            .unwrap_err();
        assert!(matches!(err, DungeonError::UnknownTemplate { .. }));
    }

    #[test]
    fn bad_tile_symbol_is_reported() {
        let mut bad = layout();
        bad.rows[0] = String::from("..?...");
        let err = bad
            .build(GameConfig::default(), &EnemyRoster::standard(), &TrapRoster::standard())
            .unwrap_err();
        assert!(matches!(err, DungeonError::InvalidLayout { .. }));
    }
}
