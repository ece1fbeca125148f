//! Immutable enemy and trap templates.
//!
//! Rosters are plain values built once (from [`EnemyRoster::standard`] or a
//! content file) and passed by reference to whatever spawns entities.

use crate::error::DungeonError;
use crate::projectile::EmitterKind;
use crate::trap::TrapKind;
use crate::types::{Direction, NavDomain};

/// Stat block an enemy is spawned from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyTemplate {
    pub kind: String,
    pub max_health: f64,
    pub offense: i32,
    pub defense: f64,
    pub sight_radius: f64,
    pub sight_bonus: f64,
    /// Experience value; a tenth is granted on death.
    pub exp: i32,
    /// Gold value; a tenth drops as loot.
    pub gold: i32,
    pub action_points: i32,
    pub attack_cost: i32,
    pub attack_range: i32,
    pub melee: bool,
    pub domain: NavDomain,
    pub emitter: Option<EmitterKind>,
}

impl Default for EnemyTemplate {
    fn default() -> Self {
        Self {
            kind: String::from("Enemy"),
            max_health: 250.0,
            offense: 15,
            defense: 0.0,
            sight_radius: 3.0,
            sight_bonus: 2.0,
            exp: 200,
            gold: 200,
            action_points: 1,
            attack_cost: 2,
            attack_range: 0,
            melee: true,
            domain: NavDomain::Ground,
            emitter: None,
        }
    }
}

impl EnemyTemplate {
    pub fn named(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    fn health(mut self, max_health: f64) -> Self {
        self.max_health = max_health;
        self
    }

    fn attack(mut self, offense: i32, defense: f64) -> Self {
        self.offense = offense;
        self.defense = defense;
        self
    }

    fn sight(mut self, radius: f64, bonus: f64) -> Self {
        self.sight_radius = radius;
        self.sight_bonus = bonus;
        self
    }

    fn value(mut self, exp: i32, gold: i32) -> Self {
        self.exp = exp;
        self.gold = gold;
        self
    }

    fn points(mut self, action_points: i32) -> Self {
        self.action_points = action_points;
        self
    }

    fn cost(mut self, attack_cost: i32) -> Self {
        self.attack_cost = attack_cost;
        self
    }

    fn ranged(mut self, range: i32, melee: bool, emitter: EmitterKind) -> Self {
        self.attack_range = range;
        self.melee = melee;
        self.emitter = Some(emitter);
        self
    }

    fn flying(mut self) -> Self {
        self.domain = NavDomain::Flying;
        self
    }
}

/// Ordered set of enemy templates with case-insensitive lookup.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EnemyRoster {
    templates: Vec<EnemyTemplate>,
}

impl EnemyRoster {
    pub fn new(templates: Vec<EnemyTemplate>) -> Self {
        Self { templates }
    }

    /// The sixteen built-in enemies.
    pub fn standard() -> Self {
        use EmitterKind::*;

        let templates = vec![
            EnemyTemplate::named("Snake").sight(2.0, 2.0).value(100, 200),
            EnemyTemplate::named("FireDemon")
                .points(2)
                .health(1000.0)
                .attack(40, 10.0)
                .sight(3.5, 2.0)
                .value(400, 480)
                .ranged(3, false, WallOfFire),
            EnemyTemplate::named("Beholder")
                .points(2)
                .health(1800.0)
                .attack(15, 15.0)
                .sight(3.0, 3.0)
                .value(900, 1400)
                .ranged(4, false, RedBeam)
                .flying(),
            EnemyTemplate::named("Bat")
                .attack(10, 0.0)
                .value(100, 150)
                .ranged(4, true, Whirlwind)
                .flying(),
            EnemyTemplate::named("Reaper")
                .points(3)
                .health(450.0)
                .attack(20, 0.0)
                .sight(4.0, 2.0)
                .value(400, 600)
                .flying(),
            EnemyTemplate::named("Poison")
                .points(2)
                .health(200.0)
                .attack(10, 0.0)
                .value(100, 180),
            EnemyTemplate::named("Hawk")
                .points(2)
                .value(100, 180)
                .flying(),
            EnemyTemplate::named("HawkJr")
                .points(2)
                .health(180.0)
                .attack(10, 0.0)
                .value(80, 150)
                .flying(),
            EnemyTemplate::named("Sorcerer")
                .health(1400.0)
                .attack(50, 30.0)
                .sight(5.0, 2.0)
                .value(1000, 2000)
                .cost(1)
                .ranged(5, false, MagicOrb),
            EnemyTemplate::named("Whispy")
                .points(4)
                .health(150.0)
                .attack(10, 0.0)
                .sight(2.0, 5.0)
                .value(400, 500)
                .ranged(0, true, MagicOrb)
                .flying(),
            EnemyTemplate::named("MegaTortoise")
                .health(1000.0)
                .attack(15, 60.0)
                .value(800, 1800)
                .cost(1)
                .flying(),
            EnemyTemplate::named("Mimic")
                .points(2)
                .health(500.0)
                .attack(40, 20.0)
                .value(400, 800)
                .cost(3),
            EnemyTemplate::named("Ember")
                .health(400.0)
                .attack(25, 0.0)
                .value(400, 800)
                .cost(1),
            EnemyTemplate::named("Golem")
                .points(2)
                .health(900.0)
                .attack(20, 30.0)
                .value(700, 1000),
            EnemyTemplate::named("Gargoyle")
                .points(2)
                .health(600.0)
                .attack(15, 10.0)
                .value(400, 800)
                .flying(),
            EnemyTemplate::named("Shaman")
                .points(2)
                .health(700.0)
                .attack(15, 15.0)
                .value(400, 1000)
                .ranged(4, true, BlueBeam),
        ];
        Self { templates }
    }

    /// Looks up a template by kind, ignoring ASCII case.
    pub fn get(&self, kind: &str) -> Result<&EnemyTemplate, DungeonError> {
        self.templates
            .iter()
            .find(|t| t.kind.eq_ignore_ascii_case(kind))
            .ok_or_else(|| DungeonError::unknown_enemy(kind))
    }

    pub fn insert(&mut self, template: EnemyTemplate) {
        match self
            .templates
            .iter_mut()
            .find(|t| t.kind.eq_ignore_ascii_case(&template.kind))
        {
            Some(slot) => *slot = template,
            None => self.templates.push(template),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Stat block a trap is placed from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrapTemplate {
    pub kind: TrapKind,
    pub damage: f64,
    pub sleep_turns: u32,
    /// Fixed push direction for wind traps; random at placement when unset.
    pub wind: Option<Direction>,
    pub exp_cost: i32,
    pub gold_cost: i32,
}

impl Default for TrapTemplate {
    fn default() -> Self {
        Self {
            kind: TrapKind::Simple,
            damage: 0.0,
            sleep_turns: 0,
            wind: None,
            exp_cost: 0,
            gold_cost: 0,
        }
    }
}

impl TrapTemplate {
    pub fn simple() -> Self {
        Self::default()
    }

    pub fn fire() -> Self {
        Self {
            kind: TrapKind::Fire,
            damage: 100.0,
            exp_cost: 500,
            gold_cost: 700,
            ..Self::default()
        }
    }

    pub fn sleep() -> Self {
        Self {
            kind: TrapKind::Sleep,
            sleep_turns: 2,
            exp_cost: 500,
            gold_cost: 700,
            ..Self::default()
        }
    }

    pub fn wind() -> Self {
        Self {
            kind: TrapKind::Wind,
            exp_cost: 1000,
            gold_cost: 700,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrapRoster {
    templates: Vec<TrapTemplate>,
}

impl TrapRoster {
    pub fn new(templates: Vec<TrapTemplate>) -> Self {
        Self { templates }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            TrapTemplate::simple(),
            TrapTemplate::fire(),
            TrapTemplate::sleep(),
            TrapTemplate::wind(),
        ])
    }

    pub fn get(&self, kind: TrapKind) -> Result<&TrapTemplate, DungeonError> {
        self.templates
            .iter()
            .find(|t| t.kind == kind)
            .ok_or_else(|| DungeonError::unknown_trap(kind.to_string()))
    }

    /// Adds `template`, replacing the entry of the same kind.
    pub fn insert(&mut self, template: TrapTemplate) {
        match self.templates.iter_mut().find(|t| t.kind == template.kind) {
            Some(slot) => *slot = template,
            None => self.templates.push(template),
        }
    }

    /// Parses `key` as a trap kind before looking it up.
    pub fn find(&self, key: &str) -> Result<&TrapTemplate, DungeonError> {
        let kind = key
            .parse::<TrapKind>()
            .map_err(|_| DungeonError::unknown_trap(key))?;
        self.get(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrapTemplate> {
        self.templates.iter()
    }
}
