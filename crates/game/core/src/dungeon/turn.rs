//! Action-point turns and the round boundary.

use super::Dungeon;
use crate::ai;
use crate::effects::EffectTag;
use crate::error::DungeonError;
use crate::event::GameEvent;
use crate::types::{Direction, EntityId};

/// One player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerCommand {
    /// Step toward the direction, or turn around when facing away from it.
    Move(Direction),
    Attack(Direction),
    /// Give up the remaining action points.
    EndTurn,
}

impl Dungeon {
    /// Starts a turn for `id`. Returns `true` when the actor may act now.
    ///
    /// Nothing changes when `skip` is set, the actor has no action points
    /// left, or it is dead. A sleeping actor loses its action points and one
    /// turn of sleep instead of acting; the first turn after waking clears
    /// the sleep marker.
    pub fn take_turn(&mut self, id: EntityId, skip: bool) -> Result<bool, DungeonError> {
        self.require_actor(id)?;
        Ok(self.begin_turn(id, skip))
    }

    pub(crate) fn begin_turn(&mut self, id: EntityId, skip: bool) -> bool {
        if skip {
            return false;
        }
        let Some(actor) = self.actor_mut(id) else {
            return false;
        };
        if actor.is_expired() || !actor.is_alive() || actor.action_points() <= 0 {
            return false;
        }
        if actor.doze() {
            return false;
        }
        actor.clear_sleep();
        if self.effects.remove(id, EffectTag::Sleep).is_some() {
            self.record(GameEvent::Woke { entity: id });
        }
        true
    }

    /// Applies one player command. Returns `true` while the player still
    /// has action points; `None` waits for input without spending any.
    pub fn player_turn(&mut self, command: Option<PlayerCommand>) -> bool {
        let id = EntityId::PLAYER;
        if !self.begin_turn(id, false) {
            return false;
        }

        match command {
            None => {}
            Some(PlayerCommand::EndTurn) => {
                if let Some(player) = self.player_mut() {
                    player.drain_action_points();
                }
                return false;
            }
            Some(PlayerCommand::Move(dir)) => self.player_step(dir),
            Some(PlayerCommand::Attack(dir)) => {
                let Some(player) = self.player_mut() else {
                    return false;
                };
                player.face(dir);
                let cost = player.attack_cost();
                self.strike(id, dir);
                if let Some(player) = self.player_mut() {
                    player.spend_action_points(cost);
                }
            }
        }

        self.player().is_some_and(|p| p.action_points() > 0)
    }

    /// Turning to face the opposite way is free; a successful step costs one.
    fn player_step(&mut self, dir: Direction) {
        let Some(player) = self.player_mut() else {
            return;
        };
        let facing = player.player_state().map(|s| s.facing);
        let origin = player.position;
        player.face(dir);
        if facing == Some(dir.opposite()) {
            return;
        }
        let target = self.grid.adjacent(origin, dir).position;
        if self.try_move_to(EntityId::PLAYER, target)
            && let Some(player) = self.player_mut()
        {
            player.spend_action_points(1);
        }
    }

    /// Runs one decision of enemy `id`. Returns `true` while it should act again.
    pub fn enemy_turn(&mut self, id: EntityId) -> bool {
        ai::enemy_turn(self, id)
    }

    /// Exhausts every enemy's action points, in placement order.
    pub fn run_enemy_phase(&mut self) {
        for id in self.enemy_ids() {
            while !self.is_over() && self.enemy_turn(id) {}
        }
    }

    /// Starts the next round: action points refill and hazards age.
    pub fn advance_round(&mut self) {
        self.round += 1;
        for actor in self.actors.iter_mut() {
            actor.reset_action_points();
        }
        for hazard in self.hazards.iter_mut() {
            hazard.advance_round();
        }
        self.record(GameEvent::RoundAdvanced { round: self.round });
    }

    /// `true` while an animation or projectile should hold the scheduler.
    pub fn requests_delay(&self) -> bool {
        self.actors.iter().any(|a| a.requests_delay()) || self.effects.has_projectiles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, PlayerClass, Stats};
    use crate::config::GameConfig;
    use crate::grid::TileKind;
    use crate::types::Position;

    fn dungeon(class: PlayerClass) -> Dungeon {
        let mut d = Dungeon::new(GameConfig::with_dimensions(6, 6));
        d.set_spawn(Position::new(2, 2)).unwrap();
        d.set_player(Actor::player(class, Stats::default()));
        d
    }

    #[test]
    fn exhausted_turn_changes_nothing() {
        let mut d = dungeon(PlayerClass::Warrior);
        d.player_mut().unwrap().drain_action_points();
        d.sleep(EntityId::PLAYER, 2).unwrap();
        let before = d.clone();
        assert!(!d.take_turn(EntityId::PLAYER, false).unwrap());
        assert_eq!(d.player(), before.player());
        assert_eq!(d.effects(), before.effects());
        assert_eq!(d.events(), before.events());
    }

    #[test]
    fn skip_never_starts_a_turn() {
        let mut d = dungeon(PlayerClass::Warrior);
        assert!(!d.take_turn(EntityId::PLAYER, true).unwrap());
        assert_eq!(d.player().unwrap().action_points(), 2);
    }

    #[test]
    fn sleep_burns_turns_then_wakes() {
        let mut d = dungeon(PlayerClass::Mage);
        d.sleep(EntityId::PLAYER, 1).unwrap();
        assert!(d.effects().contains(EntityId::PLAYER, EffectTag::Sleep));

        assert!(!d.take_turn(EntityId::PLAYER, false).unwrap());
        assert_eq!(d.player().unwrap().action_points(), 0);
        assert_eq!(d.player().unwrap().sleep_counter(), 0);

        d.advance_round();
        assert!(d.take_turn(EntityId::PLAYER, false).unwrap());
        assert!(!d.effects().contains(EntityId::PLAYER, EffectTag::Sleep));
        assert!(d.events().contains(&GameEvent::Woke {
            entity: EntityId::PLAYER
        }));
    }

    #[test]
    fn steps_cost_one_and_turning_around_is_free() {
        let mut d = dungeon(PlayerClass::Warrior);
        assert!(d.player_turn(Some(PlayerCommand::Move(Direction::Right))));
        assert_eq!(d.player().unwrap().position, Position::new(3, 2));
        assert_eq!(d.player().unwrap().action_points(), 1);

        assert!(d.player_turn(Some(PlayerCommand::Move(Direction::Left))));
        assert_eq!(d.player().unwrap().position, Position::new(3, 2));
        assert_eq!(d.player().unwrap().action_points(), 1);
        assert_eq!(
            d.player().unwrap().player_state().map(|s| s.facing),
            Some(Direction::Left)
        );

        assert!(!d.player_turn(Some(PlayerCommand::Move(Direction::Left))));
        assert_eq!(d.player().unwrap().position, Position::new(2, 2));
    }

    #[test]
    fn blocked_step_is_free() {
        let mut d = dungeon(PlayerClass::Warrior);
        d.set_tile(Position::new(2, 3), TileKind::Wall);
        assert!(d.player_turn(Some(PlayerCommand::Move(Direction::Down))));
        assert_eq!(d.player().unwrap().position, Position::new(2, 2));
        assert_eq!(d.player().unwrap().action_points(), 2);
    }

    #[test]
    fn end_turn_and_waiting() {
        let mut d = dungeon(PlayerClass::Rogue);
        assert!(d.player_turn(None));
        assert_eq!(d.player().unwrap().action_points(), 2);
        assert!(!d.player_turn(Some(PlayerCommand::EndTurn)));
        assert!(!d.player_turn(None));
    }

    #[test]
    fn rogue_attacks_cost_one() {
        let mut d = dungeon(PlayerClass::Rogue);
        assert!(d.player_turn(Some(PlayerCommand::Attack(Direction::Up))));
        assert_eq!(d.player().unwrap().action_points(), 1);
        assert!(d.requests_delay());
    }

    #[test]
    fn round_advance_refills_and_ages() {
        let mut d = dungeon(PlayerClass::Warrior);
        d.add_hazard(crate::hazard::Hazard::new(
            Position::new(0, 0),
            2,
            3,
            EntityId::SYSTEM,
        ));
        d.player_turn(Some(PlayerCommand::EndTurn));
        d.advance_round();
        assert_eq!(d.round(), 2);
        assert_eq!(d.player().unwrap().action_points(), 2);
        assert_eq!(d.hazards()[0].age(), 1);
        assert_eq!(d.events().last(), Some(&GameEvent::RoundAdvanced { round: 2 }));
    }
}
