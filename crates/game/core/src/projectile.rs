//! Projectiles and the emitters that fire them.

use crate::grid::Grid;
use crate::hazard::Hazard;
use crate::types::{Direction, EntityId, Position};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmitterKind {
    Shuriken,
    RedBeam,
    BlueBeam,
    MagicOrb,
    WallOfFire,
    Whirlwind,
}

/// Hazard left behind on every tile a trail projectile enters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSpec {
    pub damage: i32,
    pub lifespan: u32,
}

/// Template for projectiles fired by one actor.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitter {
    pub kind: EmitterKind,
    pub damage: f64,
    pub range: i32,
    /// Keeps flying after a hit.
    pub pass_through: bool,
    pub trail: Option<TrailSpec>,
    /// Pushes the victim along the flight line for the remaining range.
    pub knockback: bool,
}

impl Emitter {
    /// Stock emitter for `kind`: range 1, damage 1.
    pub fn standard(kind: EmitterKind) -> Self {
        let base = Self {
            kind,
            damage: 1.0,
            range: 1,
            pass_through: false,
            trail: None,
            knockback: false,
        };
        match kind {
            EmitterKind::Shuriken
            | EmitterKind::RedBeam
            | EmitterKind::BlueBeam
            | EmitterKind::MagicOrb => base,
            EmitterKind::WallOfFire => Self {
                pass_through: true,
                trail: Some(TrailSpec {
                    damage: 2,
                    lifespan: 3,
                }),
                ..base
            },
            EmitterKind::Whirlwind => Self {
                pass_through: true,
                knockback: true,
                ..base
            },
        }
    }

    pub fn shuriken() -> Self {
        Self::standard(EmitterKind::Shuriken)
    }

    pub fn wall_of_fire(damage: f64, hazard_damage: i32, lifespan: u32) -> Self {
        Self::standard(EmitterKind::WallOfFire)
            .with_damage(damage)
            .with_trail(TrailSpec {
                damage: hazard_damage,
                lifespan,
            })
    }

    #[must_use]
    pub fn with_damage(mut self, damage: f64) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: i32) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_trail(mut self, trail: TrailSpec) -> Self {
        self.trail = Some(trail);
        self
    }

    pub fn emit(&self, owner: EntityId, origin: Position, direction: Direction) -> Projectile {
        Projectile {
            owner,
            emitter: self.clone(),
            position: origin,
            direction,
            distance: 0,
            wait: 0.0,
            has_hit: false,
            expired: false,
            pending_hazard: None,
        }
    }
}

/// A projectile in flight. One step per particle step length; at most one
/// hit is delivered per step.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub owner: EntityId,
    pub emitter: Emitter,
    position: Position,
    direction: Direction,
    distance: i32,
    wait: f64,
    has_hit: bool,
    expired: bool,
    pending_hazard: Option<Hazard>,
}

impl Projectile {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Tiles travelled so far.
    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }

    pub(crate) fn has_hit(&self) -> bool {
        self.has_hit
    }

    pub(crate) fn mark_hit(&mut self) {
        self.has_hit = true;
    }

    /// Accumulates `dt` and takes at most one step. Returns whether it stepped.
    pub fn advance(&mut self, dt: f64, step_length: f64, grid: &Grid) -> bool {
        self.wait += dt;
        if self.expired || self.wait < step_length {
            return false;
        }
        self.wait -= self.wait.min(step_length);
        self.step(grid);
        true
    }

    fn step(&mut self, grid: &Grid) {
        let next = self.position + self.direction;
        self.position = grid.normalize(next).unwrap_or(next);
        self.distance += 1;
        self.has_hit = false;
        if let Some(trail) = self.emitter.trail {
            self.pending_hazard = Some(Hazard::new(
                self.position,
                trail.lifespan,
                trail.damage,
                self.owner,
            ));
        }
    }

    pub(crate) fn take_pending_hazard(&mut self) -> Option<Hazard> {
        self.pending_hazard.take()
    }
}
