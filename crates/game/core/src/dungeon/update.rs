//! The per-frame world tick.

use super::Dungeon;
use crate::config::GameConfig;
use crate::effects::{EffectKey, Particle};
use crate::event::{GameEvent, Outcome};
use crate::grid::TileKind;
use crate::projectile::Projectile;
use crate::types::EntityId;

impl Dungeon {
    /// Advances the world by `dt` seconds.
    ///
    /// In order: hazard contact damage, actor animation and deaths,
    /// projectile flight, hazard expiry, loot lost to pits, projectile
    /// delivery, traps, the exit check, and finally the sweep of everything
    /// that expired.
    pub fn update(&mut self, dt: f64) {
        self.inflict_hazard_damage();
        self.update_actors(dt);

        let step = self.config.particle_step;
        for (_, particle) in self.effects.iter_mut() {
            if let Particle::Projectile(projectile) = particle {
                projectile.advance(dt, step, &self.grid);
            }
        }

        for hazard in self.hazards.iter_mut() {
            hazard.update();
        }
        for loot in self.loot.iter_mut() {
            if self.grid.kind(loot.position) != TileKind::Ground {
                loot.expire();
            }
        }

        let keys: Vec<EffectKey> = self.effects.keys().collect();
        for key in keys {
            self.deliver(key);
        }

        self.trigger_traps();
        self.check_exit();
        self.sweep();
    }

    /// Each live hazard hurts the actor standing on it, once per round.
    fn inflict_hazard_damage(&mut self) {
        let mut hits = Vec::new();
        for hazard in self.hazards.iter_mut().filter(|h| !h.is_expired()) {
            let victim = self
                .actors
                .iter()
                .find(|a| a.is_alive() && !a.is_expired() && a.position == hazard.position)
                .map(|a| a.id);
            if let Some(victim) = victim
                && hazard.strike(victim)
            {
                hits.push((victim, f64::from(hazard.damage), hazard.source));
            }
        }
        for (victim, damage, source) in hits {
            self.hurt(victim, damage, source);
        }
    }

    /// Advances tweens and resolves deaths: actors out of health, or standing
    /// on a tile their domain cannot hold, die once their tween settles.
    fn update_actors(&mut self, dt: f64) {
        let move_delay = self.config.move_delay;
        let mut dying = Vec::new();
        for actor in self.actors.iter_mut().filter(|a| !a.is_expired()) {
            let falling = !self.grid.tile(actor.position).is_traversable(actor.domain);
            actor.tween.advance(dt, move_delay);
            if (falling || !actor.is_alive()) && !actor.tween.is_tweening() {
                dying.push(actor.id);
            }
        }
        for id in dying {
            self.kill(id);
        }
    }

    fn projectile_mut(&mut self, key: EffectKey) -> Option<&mut Projectile> {
        match self.effects.get_mut(key)? {
            Particle::Projectile(projectile) => Some(projectile),
            Particle::SleepMarker => None,
        }
    }

    /// Resolves what a projectile's current tile does to it and to whoever
    /// stands there, then drops any trail hazard it left.
    fn deliver(&mut self, key: EffectKey) {
        let Some(projectile) = self.projectile_mut(key) else {
            return;
        };
        if projectile.is_expired() {
            return;
        }
        let position = projectile.position();
        let direction = projectile.direction();
        let distance = projectile.distance();
        let already_hit = projectile.has_hit();
        let owner = projectile.owner;
        let emitter = projectile.emitter.clone();

        if self.grid.tile(position).is_obstruction() || distance > emitter.range {
            if let Some(projectile) = self.projectile_mut(key) {
                projectile.expire();
            }
            return;
        }

        let victim = self.living_actor_at(position).map(|a| a.id);
        if distance > 0
            && !already_hit
            && let Some(victim) = victim
        {
            if emitter.knockback {
                let mut landing = position;
                for _ in 0..emitter.range - distance {
                    let next = self.grid.adjacent(landing, direction);
                    if next.is_obstruction() {
                        break;
                    }
                    landing = next.position;
                }
                self.try_push_to(victim, landing);
            }
            self.hurt(victim, emitter.damage, owner);
            if let Some(projectile) = self.projectile_mut(key) {
                projectile.mark_hit();
                if !emitter.pass_through {
                    projectile.expire();
                }
            }
        }

        let trail = self
            .projectile_mut(key)
            .filter(|p| !p.is_expired())
            .and_then(Projectile::take_pending_hazard);
        if let Some(hazard) = trail {
            self.add_hazard(hazard);
        }
    }

    /// Springs every live trap with an actor on it.
    fn trigger_traps(&mut self) {
        let sprung: Vec<(EntityId, EntityId)> = self
            .traps
            .iter()
            .filter(|t| !t.is_expired())
            .filter_map(|t| {
                self.actors
                    .iter()
                    .find(|a| !a.is_expired() && a.position == t.position)
                    .map(|a| (t.id, a.id))
            })
            .collect();
        for (trap, victim) in sprung {
            self.activate_trap(trap, victim);
        }
    }

    /// Push, sleep, damage, notify, then the trap is spent.
    fn activate_trap(&mut self, trap_id: EntityId, victim: EntityId) {
        let Some(trap) = self.trap(trap_id) else {
            return;
        };
        let (position, wind, sleep_turns, damage) =
            (trap.position, trap.wind, trap.sleep_turns, trap.damage);
        let Some(domain) = self.actor(victim).map(|a| a.domain) else {
            return;
        };

        if let Some(dir) = wind {
            let mut target = self.grid.adjacent(position, dir);
            for _ in 1..GameConfig::WIND_PUSH_TILES {
                if !target.is_traversable(domain) {
                    break;
                }
                target = self.grid.adjacent(target.position, dir);
            }
            self.try_push_to(victim, target.position);
        }
        if sleep_turns > 0 {
            self.put_to_sleep(victim, sleep_turns);
        }
        if damage > 0.0 {
            self.hurt(victim, damage, trap_id);
        }
        self.record(GameEvent::TrapTriggered {
            trap: trap_id,
            victim,
        });
        if let Some(trap) = self.trap_mut(trap_id) {
            trap.expire();
        }
    }

    fn check_exit(&mut self) {
        let reached = self
            .player()
            .is_some_and(|p| p.is_alive() && !p.is_expired() && p.position == self.exit);
        if reached {
            self.end_session(Outcome::Win);
        }
    }

    /// Drops expired enemies, traps, hazards, loot and particles, and frees
    /// their names. A dead player stays so its final state can be read.
    fn sweep(&mut self) {
        let gone: Vec<EntityId> = self
            .actors
            .iter()
            .filter(|a| a.is_expired() && !a.is_player())
            .map(|a| a.id)
            .chain(self.traps.iter().filter(|t| t.is_expired()).map(|t| t.id))
            .collect();

        self.actors.retain(|a| a.is_player() || !a.is_expired());
        self.traps.retain(|t| !t.is_expired());
        self.hazards.retain(|h| !h.is_expired());
        self.loot.retain(|l| !l.is_expired());
        self.effects.sweep();
        self.names.retain(|_, id| !gone.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::{Actor, PlayerClass, Stats};
    use crate::config::GameConfig;
    use crate::dungeon::{Dungeon, PlayerCommand};
    use crate::event::{GameEvent, Outcome};
    use crate::grid::TileKind;
    use crate::hazard::Hazard;
    use crate::roster::{EnemyTemplate, TrapTemplate};
    use crate::types::{Direction, EntityId, Position};

    fn dungeon(class: PlayerClass, spawn: Position) -> Dungeon {
        let mut d = Dungeon::new(GameConfig::with_dimensions(10, 10).with_seed(11));
        d.set_spawn(spawn).unwrap();
        d.set_player(Actor::player(class, Stats::default()));
        d
    }

    fn damage_events(d: &Dungeon, victim: EntityId) -> usize {
        d.events()
            .iter()
            .filter(|e| matches!(e, GameEvent::DamageTaken { entity, .. } if *entity == victim))
            .count()
    }

    #[test]
    fn hazards_hurt_once_per_round() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(1, 1));
        d.add_hazard(Hazard::new(Position::new(1, 1), 3, 10, EntityId::SYSTEM));
        d.update(0.016);
        d.update(0.016);
        assert_eq!(damage_events(&d, EntityId::PLAYER), 1);

        d.advance_round();
        d.update(0.016);
        assert_eq!(damage_events(&d, EntityId::PLAYER), 2);
    }

    #[test]
    fn expired_hazards_are_swept() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(1, 1));
        d.add_hazard(Hazard::new(Position::new(4, 4), 1, 10, EntityId::SYSTEM));
        d.advance_round();
        d.update(0.016);
        assert_eq!(d.hazards().len(), 1);
        d.advance_round();
        d.update(0.016);
        assert!(d.hazards().is_empty());
    }

    #[test]
    fn pushed_into_a_pit_dies_after_the_tween() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(0, 0));
        d.set_tile(Position::new(3, 2), TileKind::Pit);
        let id = d
            .place_enemy(Position::new(2, 2), &EnemyTemplate::default(), None)
            .unwrap();
        assert!(d.try_push_to(id, Position::new(3, 2)));

        d.update(0.2);
        assert!(d.actor(id).is_some());
        d.update(0.2);
        assert!(d.actor(id).is_none());
        assert!(d.lookup("enemy1").is_none());
        assert!(d.events().iter().any(|e| matches!(e, GameEvent::Died { entity, .. } if *entity == id)));
        // Whatever it dropped fell with it.
        assert!(d.loot().is_empty());
        assert!(d.end_state().exp_gain > 0);
    }

    #[test]
    fn shuriken_hits_the_first_actor_in_line() {
        let mut d = dungeon(PlayerClass::Rogue, Position::new(1, 1));
        let id = d
            .place_enemy(Position::new(3, 1), &EnemyTemplate::default(), None)
            .unwrap();
        d.player_turn(Some(PlayerCommand::Attack(Direction::Right)));
        assert!(d.requests_delay());

        d.update(0.1);
        assert_eq!(damage_events(&d, id), 0);
        d.update(0.1);
        assert_eq!(damage_events(&d, id), 1);
        let enemy = d.actor(id).unwrap();
        assert_eq!(enemy.health(), 250.0 - 121.0);
        assert!(enemy.mind().unwrap().is_chasing());
        assert!(!d.effects().has_projectiles());
    }

    #[test]
    fn projectiles_stop_at_walls() {
        let mut d = dungeon(PlayerClass::Rogue, Position::new(1, 1));
        d.set_tile(Position::new(2, 1), TileKind::Wall);
        d.player_turn(Some(PlayerCommand::Attack(Direction::Right)));
        d.update(0.1);
        assert!(!d.effects().has_projectiles());
    }

    #[test]
    fn wall_of_fire_leaves_a_trail() {
        let mut d = dungeon(PlayerClass::Mage, Position::new(0, 1));
        d.player_turn(Some(PlayerCommand::Attack(Direction::Right)));
        d.update(0.1);
        d.update(0.1);
        assert!(d.hazard_at(Position::new(1, 1)).is_some());
        assert!(d.hazard_at(Position::new(2, 1)).is_some());
        assert_eq!(d.hazard_at(Position::new(1, 1)).map(|h| h.damage), Some(71));
    }

    #[test]
    fn fire_trap_burns_once_and_disappears() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(1, 1));
        let trap = d
            .place_trap(Position::new(2, 1), &TrapTemplate::fire(), None)
            .unwrap();
        d.player_turn(Some(PlayerCommand::Move(Direction::Right)));
        d.update(0.016);

        assert!(d.events().contains(&GameEvent::TrapTriggered {
            trap,
            victim: EntityId::PLAYER
        }));
        assert_eq!(damage_events(&d, EntityId::PLAYER), 1);
        assert!(d.traps().is_empty());
        assert!(d.lookup("firetrap1").is_none());
    }

    #[test]
    fn wind_trap_blows_the_victim_along() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(0, 0));
        let trap = d
            .place_trap(Position::new(3, 3), &TrapTemplate::wind(), None)
            .unwrap();
        d.trap_mut(trap).unwrap().wind = Some(Direction::Right);
        let id = d
            .place_enemy(Position::new(3, 3), &EnemyTemplate::default(), None)
            .unwrap();
        d.update(0.016);
        assert_eq!(d.actor(id).unwrap().position, Position::new(5, 3));
    }

    #[test]
    fn sleep_trap_puts_the_victim_to_sleep() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(1, 1));
        d.place_trap(Position::new(1, 2), &TrapTemplate::sleep(), None)
            .unwrap();
        d.player_turn(Some(PlayerCommand::Move(Direction::Down)));
        d.update(0.016);
        assert_eq!(d.player().unwrap().sleep_counter(), 2);
    }

    #[test]
    fn reaching_the_exit_wins() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(8, 9));
        d.player_turn(Some(PlayerCommand::Move(Direction::Right)));
        d.update(0.016);
        assert_eq!(d.end_state().outcome, Some(Outcome::Win));
        assert!(matches!(d.events().last(), Some(GameEvent::SessionEnded(_))));
    }

    #[test]
    fn dead_player_loses_and_stays_readable() {
        let mut d = dungeon(PlayerClass::Warrior, Position::new(1, 1));
        d.take_damage(EntityId::PLAYER, 1.0e6, EntityId::SYSTEM).unwrap();
        d.update(0.016);
        assert_eq!(d.end_state().outcome, Some(Outcome::Loss));
        assert!(d.player().is_some_and(|p| p.is_expired()));
    }
}
