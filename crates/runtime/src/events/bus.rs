//! Topic-based event bus implementation.

use std::sync::Arc;

use game_core::GameEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Attacks, damage and deaths
    Combat,
    /// Sleep, traps, loot and hazards
    World,
    /// Phase and round progress
    Turn,
    /// Session outcome and script health
    Session,
}

impl Topic {
    pub const ALL: [Topic; 4] = [Topic::Combat, Topic::World, Topic::Turn, Topic::Session];

    fn index(self) -> usize {
        match self {
            Topic::Combat => 0,
            Topic::World => 1,
            Topic::Turn => 2,
            Topic::Session => 3,
        }
    }
}

/// Step of the round a session is in.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Player,
    Script,
    Enemies,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Drained from the dungeon journal.
    Game(GameEvent),

    PhaseStarted { round: u32, phase: Phase },

    /// The script hook failed and runs as a no-op from now on.
    ScriptDegraded { reason: String },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Game(event) => match event {
                GameEvent::Attacked { .. }
                | GameEvent::DamageTaken { .. }
                | GameEvent::Died { .. } => Topic::Combat,
                GameEvent::FellAsleep { .. }
                | GameEvent::Woke { .. }
                | GameEvent::TrapTriggered { .. }
                | GameEvent::LootCollected { .. }
                | GameEvent::HazardSpawned { .. } => Topic::World,
                GameEvent::RoundAdvanced { .. } => Topic::Turn,
                GameEvent::SessionEnded(_) => Topic::Session,
            },
            Event::PhaseStarted { .. } => Topic::Turn,
            Event::ScriptDegraded { .. } => Topic::Session,
        }
    }
}

/// Topic-based event bus
///
/// One broadcast channel per topic, created up front. Publishing never blocks
/// and events sent while nobody listens are dropped.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 4]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channels[topic.index()].send(event).is_err() {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.index()].subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels[topic.index()].receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
