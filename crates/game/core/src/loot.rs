//! Pickups dropped by defeated enemies.

use crate::types::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootKind {
    Gold { value: i32 },
    /// Heals a percentage of the collector's max health.
    Potion { heal_percent: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Loot {
    pub position: Position,
    pub kind: LootKind,
    expired: bool,
}

impl Loot {
    pub fn new(position: Position, kind: LootKind) -> Self {
        Self {
            position,
            kind,
            expired: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }
}
