//! Actors: the player and enemies share one concrete type.
//!
//! Class-specific combat is expressed through [`MeleeStyle`], [`RangedStyle`]
//! and [`DeathStyle`] values chosen at spawn time, while [`Role`] carries the
//! state only one side needs (facing for the player, the enemy mind).
//!
//! Numeric state is clamped where it is written: health never exceeds its
//! maximum, action points stay within `[0, base]`, and the sleep counter is
//! never negative. Anything that touches other entities lives on
//! [`Dungeon`](crate::dungeon::Dungeon).

mod enemy;
mod tween;

pub use enemy::EnemyMind;
pub use tween::{PixelOffset, Tween};

use core::ops::Add;

use crate::pathfinding::Mover;
use crate::projectile::Emitter;
use crate::roster::EnemyTemplate;
use crate::types::{Direction, EntityId, NavDomain, Position};

/// Numeric stat totals supplied by the equipment layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub max_health: i32,
    pub offense: i32,
    pub defense: f64,
    pub dexterity: i32,
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Stats) -> Stats {
        Stats {
            max_health: self.max_health + rhs.max_health,
            offense: self.offense + rhs.offense,
            defense: self.defense + rhs.defense,
            dexterity: self.dexterity + rhs.dexterity,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerClass {
    #[default]
    Warrior,
    Mage,
    Rogue,
}

impl PlayerClass {
    pub const fn base_stats(self) -> Stats {
        match self {
            PlayerClass::Warrior => Stats {
                max_health: 713,
                offense: 102,
                defense: 38.0,
                dexterity: 30,
            },
            PlayerClass::Mage => Stats {
                max_health: 512,
                offense: 142,
                defense: 19.0,
                dexterity: 45,
            },
            PlayerClass::Rogue => Stats {
                max_health: 610,
                offense: 121,
                defense: 29.0,
                dexterity: 60,
            },
        }
    }
}

/// What happens when an actor attacks an adjacent living actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeleeStyle {
    /// Bump animation only.
    Nudge,
    /// Bump and deal `offense` damage.
    Strike,
    /// Bump and put the victim to sleep without damage.
    Stun { turns: u32 },
}

/// What happens when an actor attacks without an adjacent melee target.
#[derive(Clone, Debug, PartialEq)]
pub enum RangedStyle {
    None,
    /// Fire a projectile built from this emitter.
    Emit(Emitter),
    /// Warrior charge along the attack line.
    Dash,
}

/// Consequences of dying beyond expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathStyle {
    /// Drop loot and grant a share of these totals.
    Reward { exp: i32, gold: i32 },
    /// The session ends as a loss.
    EndSession,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub class: PlayerClass,
    pub facing: Direction,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    Player(PlayerState),
    Enemy(Box<EnemyMind>),
}

/// `amount` scaled by defense: `100/(100+d)` for `d >= 0`, `2 - 100/(100-d)` below zero.
pub fn defense_multiplier(defense: f64) -> f64 {
    if defense >= 0.0 {
        100.0 / (100.0 + defense)
    } else {
        2.0 - 100.0 / (100.0 - defense)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub position: Position,
    health: f64,
    max_health: f64,
    base_action_points: i32,
    action_points: i32,
    attack_cost: i32,
    pub attack_range: i32,
    pub melee_capable: bool,
    pub domain: NavDomain,
    sleep: u32,
    expired: bool,
    pub offense: i32,
    pub defense: f64,
    pub melee: MeleeStyle,
    pub ranged: RangedStyle,
    pub death: DeathStyle,
    pub tween: Tween,
    pub role: Role,
}

impl Actor {
    /// Generic actor with the base defaults: 400 health, 1 AP, attack cost 2,
    /// melee only, walking.
    pub fn new(role: Role) -> Self {
        Self {
            id: EntityId::SYSTEM,
            name: String::new(),
            position: Position::ORIGIN,
            health: 400.0,
            max_health: 400.0,
            base_action_points: 1,
            action_points: 1,
            attack_cost: 2,
            attack_range: 0,
            melee_capable: true,
            domain: NavDomain::Ground,
            sleep: 0,
            expired: false,
            offense: 0,
            defense: 0.0,
            melee: MeleeStyle::Nudge,
            ranged: RangedStyle::None,
            death: DeathStyle::Reward { exp: 0, gold: 0 },
            tween: Tween::default(),
            role,
        }
    }

    /// Player of `class` with the class base stats plus `bonus`.
    pub fn player(class: PlayerClass, bonus: Stats) -> Self {
        let stats = class.base_stats() + bonus;
        let mut actor = Self::new(Role::Player(PlayerState {
            class,
            facing: Direction::Down,
        }));
        actor.set_max_health(f64::from(stats.max_health));
        actor.offense = stats.offense;
        actor.defense = stats.defense;
        actor.death = DeathStyle::EndSession;
        actor.set_base_action_points(2);

        match class {
            PlayerClass::Warrior => {
                actor.attack_range = 3;
                actor.melee = MeleeStyle::Strike;
                actor.ranged = RangedStyle::Dash;
            }
            PlayerClass::Mage => {
                actor.attack_range = 4;
                actor.melee_capable = false;
                let damage = f64::from(stats.offense);
                actor.ranged = RangedStyle::Emit(
                    Emitter::wall_of_fire(damage, (stats.offense / 2).max(1), 3)
                        .with_range(actor.attack_range),
                );
            }
            PlayerClass::Rogue => {
                actor.set_attack_cost(1);
                actor.attack_range = 4;
                actor.melee = MeleeStyle::Stun { turns: 2 };
                actor.ranged = RangedStyle::Emit(
                    Emitter::shuriken()
                        .with_damage(f64::from(stats.offense))
                        .with_range(actor.attack_range),
                );
            }
        }
        actor
    }

    /// Independent enemy instance at full health and action points.
    pub fn enemy(template: &EnemyTemplate) -> Self {
        let mut actor = Self::new(Role::Enemy(Box::new(EnemyMind::new(template))));
        actor.set_max_health(template.max_health);
        actor.offense = template.offense;
        actor.defense = template.defense;
        actor.set_base_action_points(template.action_points);
        actor.set_attack_cost(template.attack_cost);
        actor.attack_range = template.attack_range.max(0);
        actor.melee_capable = template.melee;
        actor.domain = template.domain;
        actor.melee = MeleeStyle::Strike;
        actor.death = DeathStyle::Reward {
            exp: template.exp,
            gold: template.gold,
        };
        if let Some(kind) = template.emitter {
            actor.ranged = RangedStyle::Emit(
                Emitter::standard(kind)
                    .with_damage(f64::from(template.offense))
                    .with_range(actor.attack_range),
            );
        }
        actor
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.role {
            Role::Player(state) => Some(state),
            Role::Enemy(_) => None,
        }
    }

    /// Turns the player toward `dir`. Enemies have no facing.
    pub fn face(&mut self, dir: Direction) {
        if let Role::Player(state) = &mut self.role {
            state.facing = dir;
        }
    }

    /// What the pathfinder needs to know about this actor.
    pub fn mover(&self) -> Mover {
        Mover {
            position: self.position,
            domain: self.domain,
            attack_range: self.attack_range,
            health_ratio: self.health_ratio(),
        }
    }

    pub fn mind(&self) -> Option<&EnemyMind> {
        match &self.role {
            Role::Enemy(mind) => Some(mind),
            Role::Player(_) => None,
        }
    }

    pub fn mind_mut(&mut self) -> Option<&mut EnemyMind> {
        match &mut self.role {
            Role::Enemy(mind) => Some(mind),
            Role::Player(_) => None,
        }
    }

    // ===== health =====

    /// Current health, always within `[0, max_health]`.
    pub fn health(&self) -> f64 {
        self.health.clamp(0.0, self.max_health)
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    /// Sets the maximum and refills health to it.
    pub fn set_max_health(&mut self, max_health: f64) {
        self.max_health = max_health.max(0.0);
        self.health = self.max_health;
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Fraction of health remaining.
    pub fn health_ratio(&self) -> f64 {
        if self.max_health > 0.0 {
            self.health() / self.max_health
        } else {
            0.0
        }
    }

    /// Scales `amount` by defense and subtracts it. Returns the damage applied.
    ///
    /// Only the ceiling is enforced here; death handling zeroes the floor.
    pub fn apply_damage(&mut self, amount: f64) -> f64 {
        let effective = amount * defense_multiplier(self.defense);
        self.write_health(self.health - effective);
        effective
    }

    /// Unscaled healing, capped at the maximum. Returns the amount requested.
    pub fn restore(&mut self, amount: f64) -> f64 {
        self.write_health(self.health + amount);
        amount
    }

    fn write_health(&mut self, value: f64) {
        self.health = value.min(self.max_health);
    }

    pub(crate) fn mark_dead(&mut self) {
        self.health = 0.0;
        self.expired = true;
    }

    // ===== action points =====

    pub fn action_points(&self) -> i32 {
        self.action_points
    }

    pub fn base_action_points(&self) -> i32 {
        self.base_action_points
    }

    pub fn set_base_action_points(&mut self, base: i32) {
        self.base_action_points = base.max(0);
        self.action_points = self.base_action_points;
    }

    pub fn reset_action_points(&mut self) {
        self.action_points = self.base_action_points;
    }

    pub(crate) fn spend_action_points(&mut self, amount: i32) {
        self.action_points = (self.action_points - amount).clamp(0, self.base_action_points);
    }

    pub(crate) fn drain_action_points(&mut self) {
        self.action_points = 0;
    }

    pub fn attack_cost(&self) -> i32 {
        self.attack_cost
    }

    /// Attack cost is at least one so that attacking always ends a turn eventually.
    pub fn set_attack_cost(&mut self, cost: i32) {
        self.attack_cost = cost.max(1);
    }

    pub fn has_ranged_attack(&self) -> bool {
        self.attack_range > 0
    }

    // ===== sleep =====

    pub fn sleep_counter(&self) -> u32 {
        self.sleep
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleep > 0
    }

    /// Max-merges the sleep counter. Returns `true` when an awake, living
    /// actor has just fallen asleep.
    pub(crate) fn extend_sleep(&mut self, turns: u32) -> bool {
        let fell_asleep = !self.is_sleeping() && self.is_alive();
        self.sleep = self.sleep.max(turns);
        fell_asleep && self.is_sleeping()
    }

    /// Burns one sleeping turn. Returns `false` when the actor was awake.
    pub(crate) fn doze(&mut self) -> bool {
        if self.sleep == 0 {
            return false;
        }
        self.sleep -= 1;
        self.drain_action_points();
        true
    }

    pub(crate) fn clear_sleep(&mut self) {
        self.sleep = 0;
    }

    /// Damage dealt by melee strikes and emitted projectiles.
    pub fn attack_damage(&self) -> f64 {
        f64::from(self.offense)
    }

    pub fn requests_delay(&self) -> bool {
        self.tween.is_tweening()
    }
}
