//! Enemy decision making.
//!
//! An enemy turn is one tick of a behavior tree over [`EnemyTurn`]:
//!
//! ```text
//! Sequence
//!   ├─ BeginTurn          action points, sleep, wake
//!   ├─ RecoverPath        re-route when the next step is blocked
//!   ├─ AlwaysSucceed
//!   │   └─ Sense          spot the player, sticky while chasing
//!   ├─ Arbitrate          pursuit > investigation > target > waypoint
//!   ├─ PlanRoute          A* toward the chosen destination
//!   └─ Selector
//!       ├─ Engage         attack when in reach
//!       └─ Advance        take the next step
//! ```
//!
//! Patrolling, investigating and chasing are never stored as a state; they
//! fall out of which fields of the [`EnemyMind`] are set when the tree runs.

pub mod nodes;

use behavior_tree::{AlwaysSucceed, Behavior, Selector, Sequence};

use crate::actor::{Actor, EnemyMind};
use crate::dungeon::Dungeon;
use crate::types::{EntityId, Position};

use nodes::{Advance, Arbitrate, BeginTurn, Engage, PlanRoute, RecoverPath, Sense};

/// Blackboard for a single enemy turn.
pub struct EnemyTurn<'a> {
    /// The enemy deciding.
    pub entity: EntityId,
    pub dungeon: &'a mut Dungeon,
    /// Resolved by [`Arbitrate`], consumed by [`PlanRoute`].
    pub destination: Option<Position>,
}

impl<'a> EnemyTurn<'a> {
    pub fn new(entity: EntityId, dungeon: &'a mut Dungeon) -> Self {
        Self {
            entity,
            dungeon,
            destination: None,
        }
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.dungeon.actor(self.entity)
    }

    pub fn mind(&self) -> Option<&EnemyMind> {
        self.actor().and_then(Actor::mind)
    }

    pub fn mind_mut(&mut self) -> Option<&mut EnemyMind> {
        self.dungeon
            .actor_mut(self.entity)
            .and_then(Actor::mind_mut)
    }

    /// Position of the pursued actor while it is alive.
    pub fn pursued_position(&self) -> Option<Position> {
        let pursued = self.mind()?.pursuit()?;
        self.dungeon
            .actor(pursued)
            .filter(|a| a.is_alive() && !a.is_expired())
            .map(|a| a.position)
    }
}

/// The tree every enemy runs.
pub fn enemy_tree<'a>() -> Sequence<'a, EnemyTurn<'a>> {
    Sequence::new(vec![
        Box::new(BeginTurn),
        Box::new(RecoverPath),
        Box::new(AlwaysSucceed::<'a, EnemyTurn<'a>>::new(Box::new(Sense))),
        Box::new(Arbitrate),
        Box::new(PlanRoute),
        Box::new(Selector::<'a, EnemyTurn<'a>>::new(vec![
            Box::new(Engage),
            Box::new(Advance),
        ])),
    ])
}

/// Runs one decision for enemy `entity`. Returns `true` while it has action
/// points left and should decide again.
pub fn enemy_turn(dungeon: &mut Dungeon, entity: EntityId) -> bool {
    if dungeon.actor(entity).is_none_or(Actor::is_player) {
        return false;
    }
    let tree = enemy_tree();
    let mut turn = EnemyTurn::new(entity, dungeon);
    if tree.tick(&mut turn).is_failure() {
        return false;
    }
    turn.actor().is_some_and(|a| a.action_points() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{PlayerClass, Stats};
    use crate::config::GameConfig;
    use crate::effects::EffectTag;
    use crate::event::GameEvent;
    use crate::grid::TileKind;
    use crate::projectile::EmitterKind;
    use crate::roster::EnemyTemplate;

    fn board() -> Dungeon {
        Dungeon::new(GameConfig::with_dimensions(10, 10).with_seed(3))
    }

    fn with_player(at: Position) -> Dungeon {
        let mut d = board();
        d.set_spawn(at).unwrap();
        d.set_player(Actor::player(PlayerClass::Warrior, Stats::default()));
        d
    }

    fn run_round(d: &mut Dungeon) {
        d.run_enemy_phase();
        d.advance_round();
    }

    #[test]
    fn single_waypoint_patrol_walks_there_and_stays() {
        let mut d = board();
        let waypoint = Position::new(5, 5);
        let id = d
            .place_enemy(Position::new(1, 5), &EnemyTemplate::default(), None)
            .unwrap();
        d.actor_mut(id).unwrap().mind_mut().unwrap().set_patrol([waypoint]);

        for step in 1..=4 {
            run_round(&mut d);
            assert_eq!(d.actor(id).unwrap().position, Position::new(1 + step, 5));
        }
        run_round(&mut d);
        let enemy = d.actor(id).unwrap();
        assert_eq!(enemy.position, waypoint);
        assert_eq!(enemy.mind().unwrap().current_waypoint(), Some(waypoint));
        assert!(!enemy.mind().unwrap().is_en_route());
    }

    #[test]
    fn exhausted_enemy_does_nothing() {
        let mut d = board();
        let id = d
            .place_enemy(Position::new(2, 2), &EnemyTemplate::default(), None)
            .unwrap();
        d.actor_mut(id).unwrap().mind_mut().unwrap().set_patrol([Position::new(6, 2)]);
        d.actor_mut(id).unwrap().drain_action_points();
        let before = d.clone();

        assert!(!d.enemy_turn(id));
        assert_eq!(d.actor(id), before.actor(id));
        assert!(d.events().is_empty());
    }

    #[test]
    fn chases_then_strikes_in_melee() {
        let mut d = with_player(Position::new(3, 3));
        let id = d
            .place_enemy(Position::new(3, 5), &EnemyTemplate::default(), None)
            .unwrap();

        assert!(!d.enemy_turn(id));
        let enemy = d.actor(id).unwrap();
        assert_eq!(enemy.position, Position::new(3, 4));
        assert!(enemy.mind().unwrap().is_chasing());

        d.advance_round();
        d.drain_events();
        assert!(!d.enemy_turn(id));
        assert_eq!(d.actor(id).unwrap().position, Position::new(3, 4));
        assert!(d.events().iter().any(|e| matches!(
            e,
            GameEvent::DamageTaken { entity, source, .. }
                if *entity == EntityId::PLAYER && *source == id
        )));
        assert!(d.player().unwrap().health() < d.player().unwrap().max_health());
    }

    #[test]
    fn ranged_enemy_fires_along_a_clear_line() {
        let mut d = with_player(Position::new(1, 1));
        let caster = EnemyTemplate {
            attack_range: 3,
            melee: false,
            emitter: Some(EmitterKind::RedBeam),
            ..EnemyTemplate::named("Caster")
        };
        let id = d.place_enemy(Position::new(4, 1), &caster, None).unwrap();

        d.enemy_turn(id);
        assert_eq!(d.actor(id).unwrap().position, Position::new(4, 1));
        assert!(d.effects().contains(id, EffectTag::Ranged));
    }

    #[test]
    fn walls_block_the_shot() {
        let mut d = with_player(Position::new(1, 1));
        d.set_tile(Position::new(2, 1), TileKind::Wall);
        let caster = EnemyTemplate {
            attack_range: 3,
            melee: false,
            emitter: Some(EmitterKind::RedBeam),
            ..EnemyTemplate::named("Caster")
        };
        let id = d.place_enemy(Position::new(4, 1), &caster, None).unwrap();

        d.enemy_turn(id);
        assert!(!d.effects().contains(id, EffectTag::Ranged));
    }

    #[test]
    fn provoked_enemy_sees_further() {
        let mut calm = with_player(Position::new(1, 1));
        let id = calm
            .place_enemy(Position::new(5, 1), &EnemyTemplate::default(), None)
            .unwrap();
        let mut provoked = calm.clone();

        calm.enemy_turn(id);
        assert!(!calm.actor(id).unwrap().mind().unwrap().is_chasing());

        provoked.take_damage(id, 1.0, EntityId::PLAYER).unwrap();
        provoked.enemy_turn(id);
        let mind = provoked.actor(id).unwrap().mind().unwrap();
        assert!(mind.is_chasing());
        assert_eq!(mind.investigation_point(), Some(Position::new(1, 1)));
        assert_eq!(provoked.actor(id).unwrap().position, Position::new(4, 1));
    }

    #[test]
    fn investigation_point_outlives_sight() {
        let mut d = with_player(Position::new(1, 1));
        let id = d
            .place_enemy(Position::new(4, 1), &EnemyTemplate::default(), None)
            .unwrap();
        d.enemy_turn(id);
        assert!(d.actor(id).unwrap().mind().unwrap().is_chasing());

        // The player vanishes from view; the enemy still heads for the last sighting.
        d.player_mut().unwrap().position = Position::new(9, 9);
        d.advance_round();
        d.enemy_turn(id);
        let mind = d.actor(id).unwrap().mind().unwrap();
        assert!(!mind.is_chasing());
        assert_eq!(mind.investigation_point(), Some(Position::new(1, 1)));
        assert_eq!(d.actor(id).unwrap().position, Position::new(2, 1));
    }

    #[test]
    fn sleeping_enemy_skips_its_turn() {
        let mut d = with_player(Position::new(3, 3));
        let id = d
            .place_enemy(Position::new(3, 5), &EnemyTemplate::default(), None)
            .unwrap();
        d.sleep(id, 1).unwrap();
        assert!(!d.enemy_turn(id));
        assert_eq!(d.actor(id).unwrap().position, Position::new(3, 5));
        assert_eq!(d.actor(id).unwrap().action_points(), 0);
    }

    #[test]
    fn pursuit_survives_a_nap() {
        let mut d = with_player(Position::new(3, 3));
        let id = d
            .place_enemy(Position::new(3, 5), &EnemyTemplate::default(), None)
            .unwrap();
        d.take_damage(id, 1.0, EntityId::PLAYER).unwrap();
        d.sleep(id, 1).unwrap();

        assert!(!d.enemy_turn(id));
        assert!(d.actor(id).unwrap().mind().unwrap().is_chasing());

        d.advance_round();
        d.enemy_turn(id);
        assert!(d.actor(id).unwrap().mind().unwrap().is_chasing());
        assert_eq!(d.actor(id).unwrap().position, Position::new(3, 4));
    }

    #[test]
    fn commanded_target_is_cleared_on_arrival() {
        let mut d = board();
        let id = d
            .place_enemy(Position::new(0, 0), &EnemyTemplate::default(), None)
            .unwrap();
        d.actor_mut(id).unwrap().mind_mut().unwrap().target = Some(Position::new(1, 0));
        run_round(&mut d);
        assert_eq!(d.actor(id).unwrap().position, Position::new(1, 0));
        run_round(&mut d);
        assert_eq!(d.actor(id).unwrap().mind().unwrap().target, None);
    }
}
