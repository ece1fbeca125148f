//! Damage, sleep, death and the attack protocol.
//!
//! The public entry points reject ids that name no actor with
//! [`DungeonError::EntityNotFound`]; the world tick uses the unchecked forms
//! on ids it has just looked up.

use super::Dungeon;
use crate::actor::{DeathStyle, MeleeStyle, RangedStyle};
use crate::effects::{EffectTag, Particle};
use crate::error::DungeonError;
use crate::event::{GameEvent, Outcome};
use crate::loot::{Loot, LootKind};
use crate::types::{Direction, EntityId, NavDomain, Position};

impl Dungeon {
    /// Applies defense-scaled damage from `source`. Returns the damage dealt.
    ///
    /// Enemies hurt by the player start chasing the player.
    pub fn take_damage(
        &mut self,
        id: EntityId,
        amount: f64,
        source: EntityId,
    ) -> Result<f64, DungeonError> {
        self.require_actor(id)?;
        Ok(self.hurt(id, amount, source))
    }

    /// Unscaled healing capped at max health. Returns the health restored.
    pub fn heal(&mut self, id: EntityId, amount: f64) -> Result<f64, DungeonError> {
        let restored = self.actor_mut(id).map(|a| a.restore(amount));
        restored.ok_or_else(|| self.not_found(id))
    }

    /// Puts `id` to sleep for at least `turns` turns.
    ///
    /// The sleep marker appears only when an awake, living actor falls asleep.
    pub fn sleep(&mut self, id: EntityId, turns: u32) -> Result<(), DungeonError> {
        self.require_actor(id)?;
        self.put_to_sleep(id, turns);
        Ok(())
    }

    /// Zeroes health, expires the actor and drops its effects, then applies
    /// its death style. Dying twice is a no-op.
    pub fn die(&mut self, id: EntityId) -> Result<(), DungeonError> {
        self.require_actor(id)?;
        self.kill(id);
        Ok(())
    }

    /// Attacks toward `dir`.
    ///
    /// A living actor on the adjacent tile is hit in melee when this actor can
    /// melee; otherwise a ranged-capable actor uses its ranged style. The
    /// attack is recorded either way.
    pub fn attack(&mut self, id: EntityId, dir: Direction) -> Result<(), DungeonError> {
        self.require_actor(id)?;
        self.strike(id, dir);
        Ok(())
    }

    pub(crate) fn hurt(&mut self, id: EntityId, amount: f64, source: EntityId) -> f64 {
        let Some(actor) = self.actor_mut(id) else {
            return 0.0;
        };
        let dealt = actor.apply_damage(amount);
        if source.is_player()
            && let Some(mind) = actor.mind_mut()
        {
            mind.pursuit = Some(EntityId::PLAYER);
        }
        self.record(GameEvent::DamageTaken {
            entity: id,
            amount: dealt,
            source,
        });
        dealt
    }

    pub(crate) fn put_to_sleep(&mut self, id: EntityId, turns: u32) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.extend_sleep(turns) {
            self.effects.set(id, EffectTag::Sleep, Particle::SleepMarker);
            self.record(GameEvent::FellAsleep { entity: id, turns });
        }
    }

    pub(crate) fn kill(&mut self, id: EntityId) {
        let Some(actor) = self.actor_mut(id) else {
            return;
        };
        if actor.is_expired() {
            return;
        }
        actor.mark_dead();
        let position = actor.position;
        let death = actor.death;

        match death {
            DeathStyle::Reward { exp, gold } => {
                let divisor = self.config.reward_divisor.max(1);
                let kind = if self.roll_loot_kind(id, self.config.gold_drop_percent) {
                    LootKind::Gold {
                        value: (gold / divisor).max(1),
                    }
                } else {
                    LootKind::Potion {
                        heal_percent: self.config.potion_heal_percent,
                    }
                };
                self.add_loot(Loot::new(position, kind));
                self.end_state.exp_gain += (exp / divisor).max(1);
            }
            DeathStyle::EndSession => self.end_session(Outcome::Loss),
        }

        self.effects.remove_owner(id);
        self.record(GameEvent::Died {
            entity: id,
            position,
        });
    }

    pub(crate) fn strike(&mut self, id: EntityId, dir: Direction) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        let melee_capable = actor.melee_capable;
        let ranged_capable = actor.has_ranged_attack();
        let target_tile = self.grid.adjacent(actor.position, dir).position;
        let victim = self
            .living_actor_at(target_tile)
            .map(|a| a.id)
            .filter(|v| *v != id);

        match victim {
            Some(victim) if melee_capable => self.melee(id, victim, dir),
            _ if ranged_capable => self.ranged(id, dir),
            _ => {}
        }

        self.record(GameEvent::Attacked {
            actor: id,
            target: target_tile,
        });
    }

    fn melee(&mut self, id: EntityId, victim: EntityId, dir: Direction) {
        self.nudge(id, dir);
        let Some(actor) = self.actor(id) else {
            return;
        };
        match actor.melee {
            MeleeStyle::Nudge => {}
            MeleeStyle::Strike => {
                let damage = actor.attack_damage();
                self.hurt(victim, damage, id);
            }
            MeleeStyle::Stun { turns } => self.put_to_sleep(victim, turns),
        }
    }

    fn ranged(&mut self, id: EntityId, dir: Direction) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        match &actor.ranged {
            RangedStyle::None => {}
            RangedStyle::Emit(emitter) => {
                let projectile = emitter.emit(id, actor.position, dir);
                self.effects
                    .set(id, EffectTag::Ranged, Particle::Projectile(projectile));
            }
            RangedStyle::Dash => self.dash(id, dir),
        }
    }

    /// Tile a dash toward `dir` would land on.
    fn dash_landing(&self, id: EntityId, dir: Direction) -> Option<Position> {
        let actor = self.actor(id)?;
        let mut landing = actor.position;
        let toward = self.grid.adjacent(actor.position, dir).position;
        for tile in self
            .grid
            .tile_range(actor.position, toward, 1, actor.attack_range)
        {
            if tile.is_traversable(actor.domain) {
                landing = tile.position;
            }
            if !self.is_passable(tile.position, NavDomain::Flying) {
                break;
            }
        }
        Some(landing)
    }

    /// Charge along `dir`: the first actor in the way is knocked back one
    /// tile, hurt and stunned; a dash that hits nothing leaves the dasher
    /// asleep for a turn.
    fn dash(&mut self, id: EntityId, dir: Direction) {
        let Some(mut target) = self.dash_landing(id, dir) else {
            return;
        };
        let Some(actor) = self.actor(id) else {
            return;
        };
        let origin = actor.position;
        let domain = actor.domain;
        let damage = actor.attack_damage();

        let mut victim = None;
        for tile in self.grid.tile_range(origin, target, 1, 1) {
            if let Some(found) = self.living_actor_at(tile.position) {
                victim = Some(found.id);
                target = found.position;
                break;
            }
        }

        let bonus = self.grid.adjacent(target, dir).position;
        let penultimate = self.grid.adjacent(target, dir.opposite()).position;

        if let Some(hit) = victim {
            let pushed = self.try_push_to(hit, bonus);
            let nudged = !pushed && self.is_passable(penultimate, domain);
            if nudged {
                self.nudge(hit, dir);
            }
            if pushed || nudged {
                self.hurt(hit, damage, id);
                self.put_to_sleep(hit, 1);
            } else {
                victim = None;
            }
        }

        if target == origin {
            self.nudge(id, dir);
        }
        if !self.try_move_to(id, target) {
            self.try_move_to(id, penultimate);
        }
        if victim.is_none() {
            self.put_to_sleep(id, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::{Actor, PlayerClass, Stats};
    use crate::config::GameConfig;
    use crate::dungeon::Dungeon;
    use crate::effects::EffectTag;
    use crate::event::{GameEvent, Outcome};
    use crate::grid::TileKind;
    use crate::roster::{EnemyRoster, EnemyTemplate};
    use crate::types::{Direction, EntityId, Position};

    fn arena(class: PlayerClass) -> Dungeon {
        let mut d = Dungeon::new(GameConfig::with_dimensions(10, 3).with_seed(7));
        d.set_spawn(Position::new(1, 1)).unwrap();
        d.set_player(Actor::player(class, Stats::default()));
        d
    }

    fn dummy() -> EnemyTemplate {
        EnemyTemplate {
            max_health: 5000.0,
            ..EnemyTemplate::named("Dummy")
        }
    }

    #[test]
    fn player_damage_provokes_pursuit() {
        let mut d = arena(PlayerClass::Warrior);
        let id = d.place_enemy(Position::new(2, 1), &dummy(), None).unwrap();
        d.take_damage(id, 30.0, EntityId::PLAYER).unwrap();
        assert_eq!(d.actor(id).and_then(|a| a.mind()).and_then(|m| m.pursuit()), Some(EntityId::PLAYER));
        assert_eq!(d.actor(id).map(|a| a.health()), Some(4970.0));
    }

    #[test]
    fn warrior_melee_strikes_adjacent() {
        let mut d = arena(PlayerClass::Warrior);
        let id = d.place_enemy(Position::new(2, 1), &dummy(), None).unwrap();
        d.attack(EntityId::PLAYER, Direction::Right).unwrap();
        let offense = f64::from(PlayerClass::Warrior.base_stats().offense);
        assert_eq!(d.actor(id).map(|a| a.health()), Some(5000.0 - offense));
        assert!(d.events().contains(&GameEvent::Attacked {
            actor: EntityId::PLAYER,
            target: Position::new(2, 1),
        }));
    }

    #[test]
    fn rogue_melee_stuns_without_damage() {
        let mut d = arena(PlayerClass::Rogue);
        let id = d.place_enemy(Position::new(1, 2), &dummy(), None).unwrap();
        d.attack(EntityId::PLAYER, Direction::Down).unwrap();
        let enemy = d.actor(id).unwrap();
        assert_eq!(enemy.sleep_counter(), 2);
        assert_eq!(enemy.health(), 5000.0);
        assert!(d.effects().contains(id, EffectTag::Sleep));
    }

    #[test]
    fn ranged_attack_stores_one_projectile_per_owner() {
        let mut d = arena(PlayerClass::Mage);
        d.attack(EntityId::PLAYER, Direction::Right).unwrap();
        d.attack(EntityId::PLAYER, Direction::Right).unwrap();
        assert_eq!(d.effects().len(), 1);
        assert!(d.effects().contains(EntityId::PLAYER, EffectTag::Ranged));
    }

    #[test]
    fn attack_into_empty_air_is_still_recorded() {
        let mut d = arena(PlayerClass::Mage);
        d.set_tile(Position::new(1, 0), TileKind::Wall);
        d.attack(EntityId::PLAYER, Direction::Up).unwrap();
        assert!(matches!(d.events().last(), Some(GameEvent::Attacked { .. })));
    }

    #[test]
    fn dash_knocks_back_first_victim() {
        let mut d = arena(PlayerClass::Warrior);
        let id = d.place_enemy(Position::new(3, 1), &dummy(), None).unwrap();
        d.attack(EntityId::PLAYER, Direction::Right).unwrap();

        let enemy = d.actor(id).unwrap();
        assert_eq!(enemy.position, Position::new(4, 1));
        assert_eq!(enemy.sleep_counter(), 1);
        assert!(enemy.health() < 5000.0);
        let player = d.player().unwrap();
        assert_eq!(player.position, Position::new(3, 1));
        assert!(!player.is_sleeping());
    }

    #[test]
    fn empty_dash_lands_and_sleeps() {
        let mut d = arena(PlayerClass::Warrior);
        d.attack(EntityId::PLAYER, Direction::Right).unwrap();
        let player = d.player().unwrap();
        assert_eq!(player.position, Position::new(4, 1));
        assert_eq!(player.sleep_counter(), 1);
    }

    #[test]
    fn enemy_death_drops_loot_and_exp() {
        let mut d = arena(PlayerClass::Warrior);
        let snake = EnemyRoster::standard().get("snake").unwrap().clone();
        let id = d.place_enemy(Position::new(5, 1), &snake, None).unwrap();
        d.die(id).unwrap();
        let enemy = d.actor(id).unwrap();
        assert!(enemy.is_expired());
        assert_eq!(enemy.health(), 0.0);
        assert_eq!(d.loot().len(), 1);
        assert_eq!(d.end_state().exp_gain, 10);
    }

    #[test]
    fn player_death_is_a_loss() {
        let mut d = arena(PlayerClass::Rogue);
        d.die(EntityId::PLAYER).unwrap();
        assert_eq!(d.end_state().outcome, Some(Outcome::Loss));
        assert!(matches!(d.events().last(), Some(GameEvent::Died { .. })));
    }
}
