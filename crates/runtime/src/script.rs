//! Once-per-round script hook.
//!
//! The session calls the hook between the player phase and the enemy phase.
//! A hook sees named entities through [`ScriptScope`] and may steer them with
//! the same primitives the scheduler uses. The first failure, whether an
//! error or a panic, is reported and the hook is replaced by [`NoopScript`]
//! for the rest of the session.
use game_core::{Actor, Dungeon, DungeonError, ErrorSeverity, GameError, Position, Trap};
use serde::Serialize;
use thiserror::Error;

/// Round state shared with the script.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundState {
    /// Simulated seconds since the session started.
    pub elapsed: f64,
    pub round: u32,
    pub waypoints: Vec<Position>,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("no entity is named '{name}'")]
    UnknownName { name: String },

    #[error("'{name}' is not an enemy")]
    NotAnEnemy { name: String },

    #[error("'{name}' is not a trap")]
    NotATrap { name: String },

    #[error("script raised: {message}")]
    Raised { message: String },

    #[error("script panicked: {message}")]
    Panicked { message: String },

    #[error(transparent)]
    Dungeon(#[from] DungeonError),
}

impl ScriptError {
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Dungeon(err) => err.severity(),
            Self::UnknownName { .. } | Self::NotAnEnemy { .. } | Self::NotATrap { .. } => {
                ErrorSeverity::Validation
            }
            Self::Raised { .. } => ErrorSeverity::Recoverable,
            Self::Panicked { .. } => ErrorSeverity::Internal,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Dungeon(err) => err.error_code(),
            Self::UnknownName { .. } => "UNKNOWN_NAME",
            Self::NotAnEnemy { .. } => "NOT_AN_ENEMY",
            Self::NotATrap { .. } => "NOT_A_TRAP",
            Self::Raised { .. } => "SCRIPT_RAISED",
            Self::Panicked { .. } => "SCRIPT_PANICKED",
        }
    }
}

/// What a script may touch during its turn.
pub struct ScriptScope<'a> {
    pub dungeon: &'a mut Dungeon,
    pub state: &'a RoundState,
}

impl ScriptScope<'_> {
    pub fn enemy(&self, name: &str) -> Result<&Actor, ScriptError> {
        let id = self.resolve(name)?;
        self.dungeon
            .actor(id)
            .filter(|a| !a.is_player())
            .ok_or_else(|| ScriptError::NotAnEnemy { name: name.into() })
    }

    pub fn enemy_mut(&mut self, name: &str) -> Result<&mut Actor, ScriptError> {
        let id = self.resolve(name)?;
        self.dungeon
            .actor_mut(id)
            .filter(|a| !a.is_player())
            .ok_or_else(|| ScriptError::NotAnEnemy { name: name.into() })
    }

    pub fn trap_mut(&mut self, name: &str) -> Result<&mut Trap, ScriptError> {
        let id = self.resolve(name)?;
        self.dungeon
            .trap_mut(id)
            .ok_or_else(|| ScriptError::NotATrap { name: name.into() })
    }

    /// Sends enemy `name` toward `target`. Pursuit and investigation still
    /// take priority in its own turn.
    pub fn command(&mut self, name: &str, target: Position) -> Result<(), ScriptError> {
        let enemy = self.enemy_mut(name)?;
        if let Some(mind) = enemy.mind_mut() {
            mind.target = Some(target);
        }
        Ok(())
    }

    /// Hurts the actor called `name`. The damage is credited to no actor.
    pub fn damage(&mut self, name: &str, amount: f64) -> Result<f64, ScriptError> {
        let id = self.resolve(name)?;
        Ok(self.dungeon.take_damage(id, amount, game_core::EntityId::SYSTEM)?)
    }

    /// Puts the actor called `name` to sleep for at least `turns` turns.
    pub fn put_to_sleep(&mut self, name: &str, turns: u32) -> Result<(), ScriptError> {
        let id = self.resolve(name)?;
        Ok(self.dungeon.sleep(id, turns)?)
    }

    fn resolve(&self, name: &str) -> Result<game_core::EntityId, ScriptError> {
        self.dungeon
            .lookup(name)
            .ok_or_else(|| ScriptError::UnknownName { name: name.into() })
    }
}

/// Runs once per round before the enemies act.
pub trait ScriptHook: Send {
    fn run_round(&mut self, scope: &mut ScriptScope<'_>) -> Result<(), ScriptError>;
}

/// A hook backed by a closure; see [`from_fn`].
pub struct FnScript<F>(F);

/// Wraps a closure as a [`ScriptHook`].
pub fn from_fn<F>(f: F) -> FnScript<F>
where
    F: FnMut(&mut ScriptScope<'_>) -> Result<(), ScriptError> + Send,
{
    FnScript(f)
}

impl<F> ScriptHook for FnScript<F>
where
    F: FnMut(&mut ScriptScope<'_>) -> Result<(), ScriptError> + Send,
{
    fn run_round(&mut self, scope: &mut ScriptScope<'_>) -> Result<(), ScriptError> {
        (self.0)(scope)
    }
}

/// The hook used when no script is loaded, and after a script fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScript;

impl ScriptHook for NoopScript {
    fn run_round(&mut self, _scope: &mut ScriptScope<'_>) -> Result<(), ScriptError> {
        Ok(())
    }
}
