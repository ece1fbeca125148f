//! Notifications recorded by the dungeon while it resolves turns and ticks.
//!
//! The core never delivers these itself; they accumulate in the dungeon's
//! journal until a caller drains them.

use crate::loot::LootKind;
use crate::types::{EntityId, Position};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    /// An attack was made toward `target`, whether or not anything was hit.
    Attacked { actor: EntityId, target: Position },

    /// Damage after defense scaling.
    DamageTaken {
        entity: EntityId,
        amount: f64,
        source: EntityId,
    },

    Died { entity: EntityId, position: Position },

    FellAsleep { entity: EntityId, turns: u32 },

    Woke { entity: EntityId },

    TrapTriggered { trap: EntityId, victim: EntityId },

    LootCollected { collector: EntityId, loot: LootKind },

    HazardSpawned { position: Position, source: EntityId },

    RoundAdvanced { round: u32 },

    SessionEnded(EndState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Win,
    Loss,
}

/// Result of a finished session plus everything earned along the way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndState {
    pub outcome: Option<Outcome>,
    pub exp_gain: i32,
    pub gold_gain: i32,
}

impl EndState {
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Records the outcome unless one is already set.
    pub(crate) fn conclude(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.outcome = Some(outcome);
        true
    }
}
