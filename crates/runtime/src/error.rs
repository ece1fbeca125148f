//! Errors surfaced by the session runtime.
//!
//! Rule violations come from `game-core` as [`DungeonError`]; the runtime only
//! adds the failures of its own collaborators.
use game_core::DungeonError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Dungeon(#[from] DungeonError),

    #[error("session has no player")]
    MissingPlayer,

    #[error("command provider failed: {message}")]
    Provider { message: String },

    #[error("command provider channel closed")]
    ProviderChannelClosed,
}

impl RuntimeError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
