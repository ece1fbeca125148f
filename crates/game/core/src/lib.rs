//! Deterministic rules of the dungeon simulation.
//!
//! `game-core` owns the board, the entity registry and every rule that moves
//! or hurts something. All state lives in [`Dungeon`]; actors, traps and
//! effects refer to each other only by [`EntityId`], and every mutation goes
//! through a `Dungeon` method. Nothing here does I/O or logs: observable
//! outcomes are recorded as [`GameEvent`]s for the caller to drain.
//!
//! A session alternates between the player phase ([`Dungeon::player_turn`]),
//! the enemy phase ([`Dungeon::run_enemy_phase`]) and
//! [`Dungeon::advance_round`], while [`Dungeon::update`] advances timers,
//! projectiles, hazards and traps every frame.
pub mod actor;
pub mod ai;
pub mod config;
pub mod descriptor;
pub mod dungeon;
pub mod effects;
pub mod error;
pub mod event;
pub mod grid;
pub mod hazard;
pub mod loot;
pub mod pathfinding;
pub mod projectile;
pub mod rng;
pub mod roster;
pub mod trap;
pub mod types;

pub use actor::{
    Actor, DeathStyle, EnemyMind, MeleeStyle, PixelOffset, PlayerClass, PlayerState, RangedStyle,
    Role, Stats, Tween, defense_multiplier,
};
pub use ai::{EnemyTurn, enemy_tree};
pub use config::GameConfig;
pub use descriptor::{DungeonDescriptor, EnemyDescriptor, TrapDescriptor};
pub use dungeon::{Dungeon, EntityKind, EntityRef, PlayerCommand, is_identifier};
pub use effects::{EffectKey, EffectRegistry, EffectTag, Particle};
pub use error::{DungeonError, ErrorContext, ErrorSeverity, GameError, TemplateKind};
pub use event::{EndState, GameEvent, Outcome};
pub use grid::{Grid, Links, Tile, TileKind};
pub use hazard::Hazard;
pub use loot::{Loot, LootKind};
pub use pathfinding::{Mover, NavMap, Path, find_path};
pub use projectile::{Emitter, EmitterKind, Projectile, TrailSpec};
pub use rng::{Dice, Roll};
pub use roster::{EnemyRoster, EnemyTemplate, TrapRoster, TrapTemplate};
pub use trap::{Trap, TrapKind};
pub use types::{Direction, EntityId, NavDomain, Position};
