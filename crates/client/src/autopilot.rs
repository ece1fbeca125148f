//! A simple player policy for headless runs.
//!
//! Shoots or strikes any enemy it can reach along a straight line, otherwise
//! walks the A* route to the exit. It passes the turn when a command would
//! change nothing.
use async_trait::async_trait;
use game_core::{Direction, Dungeon, PlayerCommand, Position, find_path};
use runtime::{CommandProvider, Result};

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Player state at the previous command: round, position, facing, AP.
    last: Option<(u32, Position, Direction, i32)>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn decide(dungeon: &Dungeon) -> PlayerCommand {
        let Some(player) = dungeon.player() else {
            return PlayerCommand::EndTurn;
        };
        if let Some(dir) = Self::target_in_reach(dungeon, player.position, player.attack_range) {
            return PlayerCommand::Attack(dir);
        }

        let path = find_path(dungeon, &player.mover(), Some(dungeon.exit()));
        path.next_step()
            .and_then(|step| player.position.direction_to(step))
            .map_or(PlayerCommand::EndTurn, PlayerCommand::Move)
    }

    fn target_in_reach(dungeon: &Dungeon, from: Position, range: i32) -> Option<Direction> {
        let grid = dungeon.grid();
        Direction::ALL.into_iter().find(|&dir| {
            (1..=range.max(1)).any(|n| {
                grid.normalize(from.step(dir, n)).is_some_and(|tile| {
                    dungeon
                        .living_actor_at(tile)
                        .is_some_and(|a| !a.is_player())
                        && (n == 1 || grid.is_clear_shot(from, tile))
                })
            })
        })
    }
}

#[async_trait]
impl CommandProvider for Autopilot {
    async fn next_command(&mut self, dungeon: &Dungeon) -> Result<Option<PlayerCommand>> {
        let Some(player) = dungeon.player() else {
            return Ok(Some(PlayerCommand::EndTurn));
        };
        let facing = player
            .player_state()
            .map_or(Direction::Down, |state| state.facing);
        let now = (
            dungeon.round(),
            player.position,
            facing,
            player.action_points(),
        );
        if self.last.replace(now) == Some(now) {
            return Ok(Some(PlayerCommand::EndTurn));
        }
        Ok(Some(Self::decide(dungeon)))
    }
}
