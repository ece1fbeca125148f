//! Error infrastructure for game-core.
//!
//! Rules that can reject a request (placement, renaming, template lookup)
//! report a [`DungeonError`]. Gameplay outcomes such as a blocked move are not
//! errors; they surface as `false` from the corresponding operation.

use crate::types::{EntityId, Position};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The request may succeed later or elsewhere (e.g. a tile is currently blocked).
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,

    /// Unrecoverable; the dungeon can no longer be trusted.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    pub actor: Option<EntityId>,
    pub position: Option<Position>,
    /// Round counter at the time of error.
    pub round: u32,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self {
            actor: None,
            position: None,
            round,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static identifier for the variant, useful for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Which template registry a lookup was made against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateKind {
    Enemy,
    Trap,
}

/// Rejections raised by dungeon construction and editing.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DungeonError {
    #[error("unknown {kind} template '{key}'")]
    UnknownTemplate { kind: TemplateKind, key: String },

    #[error("entity {id} not found")]
    EntityNotFound { id: EntityId, context: ErrorContext },

    #[error("cannot place entity at {position}: {reason}")]
    NotPlaceable {
        position: Position,
        reason: &'static str,
        context: ErrorContext,
    },

    #[error("'{name}' is not a valid identifier")]
    InvalidName { name: String },

    #[error("name '{name}' is already in use")]
    NameTaken { name: String },

    #[error("no entity is named '{name}'")]
    UnknownName { name: String },

    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },
}

impl DungeonError {
    pub fn unknown_enemy(key: impl Into<String>) -> Self {
        Self::UnknownTemplate {
            kind: TemplateKind::Enemy,
            key: key.into(),
        }
    }

    pub fn unknown_trap(key: impl Into<String>) -> Self {
        Self::UnknownTemplate {
            kind: TemplateKind::Trap,
            key: key.into(),
        }
    }

    pub fn not_found(id: EntityId, round: u32) -> Self {
        Self::EntityNotFound {
            id,
            context: ErrorContext::new(round).with_actor(id),
        }
    }

    pub fn not_placeable(position: Position, reason: &'static str, round: u32) -> Self {
        Self::NotPlaceable {
            position,
            reason,
            context: ErrorContext::new(round)
                .with_position(position)
                .with_message(reason),
        }
    }
}

impl GameError for DungeonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotPlaceable { .. } => ErrorSeverity::Recoverable,
            Self::EntityNotFound { .. } => ErrorSeverity::Internal,
            Self::UnknownTemplate { .. }
            | Self::InvalidName { .. }
            | Self::NameTaken { .. }
            | Self::UnknownName { .. }
            | Self::InvalidLayout { .. } => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::EntityNotFound { context, .. } | Self::NotPlaceable { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate { .. } => "UNKNOWN_TEMPLATE",
            Self::EntityNotFound { .. } => "ENTITY_NOT_FOUND",
            Self::NotPlaceable { .. } => "NOT_PLACEABLE",
            Self::InvalidName { .. } => "INVALID_NAME",
            Self::NameTaken { .. } => "NAME_TAKEN",
            Self::UnknownName { .. } => "UNKNOWN_NAME",
            Self::InvalidLayout { .. } => "INVALID_LAYOUT",
        }
    }
}
