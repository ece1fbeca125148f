//! Session runtime for the dungeon simulation.
//!
//! This crate drives a [`game_core::Dungeon`] through rounds and reports what
//! happened. Consumers build a [`Session`] with a [`CommandProvider`] for the
//! player and, optionally, a [`ScriptHook`], then subscribe to the
//! [`EventBus`] for the events the session publishes.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the round scheduler and command providers
//! - [`script`] defines the once-per-round script hook
//! - [`events`] provides the topic-based event bus
//! - [`error`] holds the runtime error type
pub mod error;
pub mod events;
pub mod script;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Phase, Topic};
pub use script::{FnScript, NoopScript, RoundState, ScriptError, ScriptHook, ScriptScope, from_fn};
pub use session::{
    CommandProvider, EndTurnProvider, QueuedCommands, Session, SessionConfig, SessionReport,
};
