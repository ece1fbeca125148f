//! One-shot floor traps.

use crate::roster::TrapTemplate;
use crate::types::{Direction, EntityId, Position};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrapKind {
    #[default]
    Simple,
    Fire,
    Sleep,
    Wind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trap {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub kind: TrapKind,
    pub position: Position,
    pub damage: f64,
    /// Turns of sleep inflicted on activation.
    pub sleep_turns: u32,
    /// Push direction for wind traps.
    pub wind: Option<Direction>,
    pub exp_cost: i32,
    pub gold_cost: i32,
    expired: bool,
}

impl Trap {
    pub fn new(template: &TrapTemplate, position: Position) -> Self {
        Self {
            id: EntityId::SYSTEM,
            name: String::new(),
            kind: template.kind,
            position,
            damage: template.damage,
            sleep_turns: template.sleep_turns,
            wind: template.wind,
            exp_cost: template.exp_cost,
            gold_cost: template.gold_cost,
            expired: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }

    /// Sets the wind direction from text such as `"up"`. Unknown text is ignored.
    pub fn set_wind_direction(&mut self, text: &str) -> bool {
        match text.parse::<Direction>() {
            Ok(dir) => {
                self.wind = Some(dir);
                true
            }
            Err(_) => false,
        }
    }
}
