//! Topic-based event bus for session events.
//!
//! Game events drained from the dungeon journal are republished here, grouped
//! by topic, so consumers only subscribe to what they need.

mod bus;

pub use bus::{Event, EventBus, Phase, Topic};
