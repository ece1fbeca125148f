//! Committed moves, pushes and bumps.

use super::Dungeon;
use crate::event::GameEvent;
use crate::loot::LootKind;
use crate::types::{Direction, EntityId, Position};

impl Dungeon {
    /// Moves `id` onto `pos` when the tile admits its domain and no living
    /// actor holds it.
    ///
    /// A blocked move onto the actor's own tile still reports success.
    pub fn try_move_to(&mut self, id: EntityId, pos: Position) -> bool {
        let Some(actor) = self.actor(id) else {
            return false;
        };
        let current = actor.position;
        if self.is_passable(pos, actor.domain) {
            self.commit_move(id, pos);
            return true;
        }
        self.grid.normalize(pos) == Some(current)
    }

    /// Moves `id` onto `pos` unless the tile is an obstruction. Pits are fine.
    pub fn try_push_to(&mut self, id: EntityId, pos: Position) -> bool {
        if self.grid.tile(pos).is_obstruction() || self.actor(id).is_none() {
            return false;
        }
        self.commit_move(id, pos);
        true
    }

    /// Bump animation toward `dir` with no logical move.
    pub fn nudge(&mut self, id: EntityId, dir: Direction) {
        let tile_size = self.config.tile_size;
        if let Some(actor) = self.actor_mut(id) {
            actor.tween.nudge(dir, tile_size);
        }
    }

    /// Records the pixel vector, then commits the position.
    fn commit_move(&mut self, id: EntityId, pos: Position) {
        let tile_size = self.config.tile_size;
        let target = self.grid.normalize(pos).unwrap_or(pos);
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        let from = actor.position;
        actor.tween.animate(from, pos, tile_size);
        actor.position = target;
        if actor.is_player() {
            self.collect_loot(id);
        }
    }

    /// Player pickup: gold goes to the reward totals, potions heal.
    fn collect_loot(&mut self, id: EntityId) {
        let Some(position) = self.actor(id).map(|a| a.position) else {
            return;
        };
        let mut collected = Vec::new();
        for loot in self.loot.iter_mut() {
            if !loot.is_expired() && loot.position == position {
                loot.expire();
                collected.push(loot.kind);
            }
        }
        for kind in collected {
            match kind {
                LootKind::Gold { value } => self.end_state.gold_gain += value,
                LootKind::Potion { heal_percent } => {
                    if let Some(actor) = self.actor_mut(id) {
                        let amount = actor.max_health() * f64::from(heal_percent) / 100.0;
                        actor.restore(amount);
                    }
                }
            }
            self.record(GameEvent::LootCollected {
                collector: id,
                loot: kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::{Actor, PlayerClass, Stats};
    use crate::config::GameConfig;
    use crate::dungeon::Dungeon;
    use crate::grid::TileKind;
    use crate::loot::{Loot, LootKind};
    use crate::roster::EnemyRoster;
    use crate::types::{EntityId, Position};

    fn with_player() -> Dungeon {
        let mut d = Dungeon::new(GameConfig::with_dimensions(6, 6));
        d.set_player(Actor::player(PlayerClass::Warrior, Stats::default()));
        d
    }

    #[test]
    fn blocked_move_onto_self_is_a_noop_success() {
        let mut d = with_player();
        let enemy = d
            .place_enemy(Position::new(1, 0), EnemyRoster::standard().get("snake").unwrap(), None)
            .unwrap();
        let player = EntityId::PLAYER;

        // Own tile is occupied by the mover itself, so the move test fails.
        assert!(d.try_move_to(player, Position::new(0, 0)));
        assert!(!d.try_move_to(player, Position::new(1, 0)));
        assert_eq!(d.actor(player).map(|a| a.position), Some(Position::new(0, 0)));
        assert_eq!(d.actor(enemy).map(|a| a.position), Some(Position::new(1, 0)));
    }

    #[test]
    fn move_commits_position_and_starts_tween() {
        let mut d = with_player();
        assert!(d.try_move_to(EntityId::PLAYER, Position::new(0, 1)));
        let player = d.player().unwrap();
        assert_eq!(player.position, Position::new(0, 1));
        assert!(player.requests_delay());
        assert_eq!(player.tween.pixel_offset().y, -32);
    }

    #[test]
    fn push_enters_pits_but_not_walls() {
        let mut d = with_player();
        d.set_tile(Position::new(1, 0), TileKind::Pit);
        d.set_tile(Position::new(0, 1), TileKind::Wall);
        assert!(!d.try_move_to(EntityId::PLAYER, Position::new(1, 0)));
        assert!(!d.try_push_to(EntityId::PLAYER, Position::new(0, 1)));
        assert!(d.try_push_to(EntityId::PLAYER, Position::new(1, 0)));
    }

    #[test]
    fn player_collects_loot() {
        let mut d = with_player();
        d.add_loot(Loot::new(Position::new(1, 0), LootKind::Gold { value: 12 }));
        d.try_move_to(EntityId::PLAYER, Position::new(1, 0));
        assert_eq!(d.end_state().gold_gain, 12);
        assert!(d.loot()[0].is_expired());
    }
}
