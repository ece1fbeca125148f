//! Lingering ground effects that hurt whoever stands on them.

use crate::types::{EntityId, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub position: Position,
    pub lifespan: u32,
    pub damage: i32,
    /// Actor credited with the damage.
    pub source: EntityId,
    age: u32,
    last_victim: Option<EntityId>,
    expired: bool,
}

impl Hazard {
    pub fn new(position: Position, lifespan: u32, damage: i32, source: EntityId) -> Self {
        Self {
            position,
            lifespan,
            damage,
            source,
            age: 0,
            last_victim: None,
            expired: false,
        }
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn turns_remaining(&self) -> i64 {
        i64::from(self.lifespan) - i64::from(self.age)
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }

    /// Records `victim` as hit. Returns `false` if it was the last one hit,
    /// so repeated ticks within a round deal damage once.
    pub(crate) fn strike(&mut self, victim: EntityId) -> bool {
        if self.last_victim == Some(victim) {
            return false;
        }
        self.last_victim = Some(victim);
        true
    }

    /// Ages the hazard by a round and forgets the last victim.
    pub(crate) fn advance_round(&mut self) {
        self.age += 1;
        self.last_victim = None;
    }

    /// Expires once older than its lifespan.
    pub(crate) fn update(&mut self) {
        if self.age > self.lifespan {
            self.expire();
        }
    }
}
