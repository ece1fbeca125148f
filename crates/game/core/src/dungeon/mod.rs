//! The dungeon: board, entity registry, and everything that acts on both.
//!
//! Entities never hold references to each other or to the dungeon. Every
//! interaction is a method here taking [`EntityId`]s, so the registry stays
//! the single owner of actors, traps, hazards, loot and transient effects.
//! Dead entities are flagged expired and physically removed only by the sweep
//! at the end of [`Dungeon::update`].

mod combat;
mod movement;
mod naming;
mod turn;
mod update;

pub use naming::is_identifier;
pub use turn::PlayerCommand;

use std::collections::BTreeMap;

use crate::actor::{Actor, DeathStyle};
use crate::config::GameConfig;
use crate::effects::{EffectKey, EffectRegistry, Particle};
use crate::error::DungeonError;
use crate::event::{EndState, GameEvent, Outcome};
use crate::grid::{Grid, TileKind};
use crate::hazard::Hazard;
use crate::loot::Loot;
use crate::pathfinding::NavMap;
use crate::rng::{Dice, Roll};
use crate::roster::{EnemyTemplate, TrapTemplate};
use crate::trap::{Trap, TrapKind};
use crate::types::{Direction, EntityId, NavDomain, Position};

/// Borrowed view of one registry entry.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    Loot(&'a Loot),
    Actor(&'a Actor),
    Hazard(&'a Hazard),
    Trap(&'a Trap),
    Particle(EffectKey, &'a Particle),
    Waypoint(Position),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Loot,
    Actor,
    Hazard,
    Trap,
    Particle,
    Waypoint,
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Loot(_) => EntityKind::Loot,
            EntityRef::Actor(_) => EntityKind::Actor,
            EntityRef::Hazard(_) => EntityKind::Hazard,
            EntityRef::Trap(_) => EntityKind::Trap,
            EntityRef::Particle(..) => EntityKind::Particle,
            EntityRef::Waypoint(_) => EntityKind::Waypoint,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dungeon {
    config: GameConfig,
    grid: Grid,
    /// Player first when present, then enemies in placement order.
    actors: Vec<Actor>,
    traps: Vec<Trap>,
    hazards: Vec<Hazard>,
    loot: Vec<Loot>,
    effects: EffectRegistry,
    names: BTreeMap<String, EntityId>,
    waypoints: Vec<Position>,
    spawn: Position,
    exit: Position,
    round: u32,
    end_state: EndState,
    journal: Vec<GameEvent>,
    next_id: u32,
    dice: Dice,
    script: Option<String>,
}

impl Dungeon {
    /// Open ground board sized by `config`.
    pub fn new(config: GameConfig) -> Self {
        let grid = Grid::from_config(&config);
        Self::with_grid(config, grid)
    }

    /// Uses `grid` as the board; the config's dimensions are overwritten to match.
    pub fn with_grid(mut config: GameConfig, grid: Grid) -> Self {
        config.width = grid.width();
        config.height = grid.height();
        config.wrap_around = grid.wraps();
        let exit = Position::new(grid.width() - 1, grid.height() - 1);
        let dice = Dice::new(config.seed);
        Self {
            config,
            grid,
            actors: Vec::new(),
            traps: Vec::new(),
            hazards: Vec::new(),
            loot: Vec::new(),
            effects: EffectRegistry::new(),
            names: BTreeMap::new(),
            waypoints: Vec::new(),
            spawn: Position::ORIGIN,
            exit,
            round: 1,
            end_state: EndState::default(),
            journal: Vec::new(),
            next_id: 1,
            dice,
            script: None,
        }
    }

    // ===== board =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn end_state(&self) -> &EndState {
        &self.end_state
    }

    pub fn is_over(&self) -> bool {
        self.end_state.is_over()
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn set_script(&mut self, source: Option<String>) {
        self.script = source;
    }

    /// Replaces a tile, evicting entities the new tile cannot hold.
    pub fn set_tile(&mut self, pos: Position, kind: TileKind) -> bool {
        if !self.grid.set_kind(pos, kind) {
            return false;
        }
        let Some(pos) = self.grid.normalize(pos) else {
            return true;
        };
        let evicted: Vec<EntityId> = self
            .actors
            .iter()
            .filter(|a| !a.is_player() && a.position == pos && !kind.is_traversable(a.domain))
            .map(|a| a.id)
            .collect();
        for id in evicted {
            self.remove_enemy(id);
        }
        if !kind.is_traversable(NavDomain::Ground) {
            let traps: Vec<EntityId> = self
                .traps
                .iter()
                .filter(|t| t.position == pos)
                .map(|t| t.id)
                .collect();
            for id in traps {
                self.remove_trap(id);
            }
            self.loot.retain(|l| l.position != pos);
            self.hazards.retain(|h| h.position != pos);
            self.waypoints.retain(|w| *w != pos);
        }
        true
    }

    /// Moves the player spawn. The tile must be passable on foot.
    pub fn set_spawn(&mut self, pos: Position) -> Result<(), DungeonError> {
        self.spawn = self.ground_passable(pos, "spawn must be passable on foot")?;
        Ok(())
    }

    /// Moves the exit. The tile must be passable on foot.
    pub fn set_exit(&mut self, pos: Position) -> Result<(), DungeonError> {
        self.exit = self.ground_passable(pos, "exit must be passable on foot")?;
        Ok(())
    }

    fn ground_passable(&self, pos: Position, reason: &'static str) -> Result<Position, DungeonError> {
        match self.grid.normalize(pos) {
            Some(p) if self.is_passable(p, NavDomain::Ground) => Ok(p),
            _ => Err(DungeonError::not_placeable(pos, reason, self.round)),
        }
    }

    /// Adds a shared waypoint; duplicates are ignored.
    pub fn add_waypoint(&mut self, pos: Position) -> bool {
        if self.waypoints.contains(&pos) {
            return false;
        }
        self.waypoints.push(pos);
        true
    }

    // ===== journal =====

    pub fn events(&self) -> &[GameEvent] {
        &self.journal
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.journal)
    }

    pub(crate) fn record(&mut self, event: GameEvent) {
        self.journal.push(event);
    }

    pub(crate) fn end_session(&mut self, outcome: Outcome) {
        if self.end_state.conclude(outcome) {
            self.record(GameEvent::SessionEnded(self.end_state));
        }
    }

    // ===== actors =====

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn player(&self) -> Option<&Actor> {
        self.actors.first().filter(|a| a.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.actors.first_mut().filter(|a| a.is_player())
    }

    /// Installs the player at the spawn point, replacing any previous player.
    pub fn set_player(&mut self, mut player: Actor) {
        player.id = EntityId::PLAYER;
        player.name = String::from("player");
        player.position = self.spawn;
        if self.player().is_some() {
            self.actors[0] = player;
        } else {
            self.actors.insert(0, player);
        }
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter().filter(|a| !a.is_player())
    }

    /// Enemy ids in registry order.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.enemies().map(|a| a.id).collect()
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn not_found(&self, id: EntityId) -> DungeonError {
        DungeonError::not_found(id, self.round)
    }

    /// `Ok` when `id` names an actor still in the registry.
    pub(crate) fn require_actor(&self, id: EntityId) -> Result<(), DungeonError> {
        match self.actor(id) {
            Some(_) => Ok(()),
            None => Err(self.not_found(id)),
        }
    }

    pub(crate) fn actor_index(&self, id: EntityId) -> Option<usize> {
        self.actors.iter().position(|a| a.id == id)
    }

    /// First unexpired actor standing on `pos`, including one whose health
    /// reached zero but whose death has not resolved yet.
    pub fn actor_at(&self, pos: Position) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|a| !a.is_expired() && a.position == pos)
    }

    pub fn living_actor_at(&self, pos: Position) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|a| a.is_alive() && !a.is_expired() && a.position == pos)
    }

    /// Traversable for `domain` and not held by a living actor.
    pub fn is_passable(&self, pos: Position, domain: NavDomain) -> bool {
        self.grid.tile(pos).is_traversable(domain)
            && self
                .grid
                .normalize(pos)
                .is_some_and(|p| self.living_actor_at(p).is_none())
    }

    /// Spawns an enemy from `template` at `pos`.
    ///
    /// The tile must be traversable for the enemy; an enemy already there is
    /// replaced. `name` is generated from the template kind when omitted.
    pub fn place_enemy(
        &mut self,
        pos: Position,
        template: &EnemyTemplate,
        name: Option<&str>,
    ) -> Result<EntityId, DungeonError> {
        if self.enemies().count() >= GameConfig::MAX_ENEMIES {
            return Err(DungeonError::not_placeable(pos, "enemy limit reached", self.round));
        }
        let mut enemy = Actor::enemy(template);
        let pos = self.placeable(pos, enemy.domain)?;
        let name = self.claim_name(&template.kind, name)?;

        let existing = self.enemies().find(|a| a.position == pos).map(|a| a.id);
        if let Some(existing) = existing {
            self.remove_enemy(existing);
        }
        let id = self.allocate_id();
        enemy.id = id;
        enemy.position = pos;
        enemy.name = name.clone();
        self.names.insert(name, id);
        self.actors.push(enemy);
        Ok(id)
    }

    /// Places a trap from `template` at `pos`, replacing any trap there.
    pub fn place_trap(
        &mut self,
        pos: Position,
        template: &TrapTemplate,
        name: Option<&str>,
    ) -> Result<EntityId, DungeonError> {
        let pos = self.placeable(pos, NavDomain::Ground)?;
        let base = format!("{}trap", template.kind);
        let name = self.claim_name(&base, name)?;

        if let Some(existing) = self.traps.iter().find(|t| t.position == pos).map(|t| t.id) {
            self.remove_trap(existing);
        }
        let id = self.allocate_id();
        let mut trap = Trap::new(template, pos);
        trap.id = id;
        trap.name = name.clone();
        if trap.kind == TrapKind::Wind && trap.wind.is_none() {
            let roll = self.dice.pick(id.0, Roll::WindDirection, Direction::ALL.len());
            trap.wind = Some(Direction::ALL[roll]);
        }
        self.names.insert(name, id);
        self.traps.push(trap);
        Ok(id)
    }

    fn placeable(&self, pos: Position, domain: NavDomain) -> Result<Position, DungeonError> {
        match self.grid.normalize(pos) {
            Some(p) if self.grid.tile(p).is_traversable(domain) => Ok(p),
            Some(_) => Err(DungeonError::not_placeable(
                pos,
                "tile cannot hold this entity",
                self.round,
            )),
            None => Err(DungeonError::not_placeable(pos, "off the board", self.round)),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn roll_loot_kind(&mut self, entity: EntityId, gold_percent: u32) -> bool {
        self.dice.chance(entity.0, Roll::LootKind, gold_percent)
    }

    fn remove_enemy(&mut self, id: EntityId) {
        self.actors.retain(|a| a.id != id || a.is_player());
        self.effects.remove_owner(id);
        self.names.retain(|_, v| *v != id);
    }

    fn remove_trap(&mut self, id: EntityId) {
        self.traps.retain(|t| t.id != id);
        self.names.retain(|_, v| *v != id);
    }

    /// Removes the enemy, trap or waypoint at `pos`, in that order of preference.
    pub fn remove_entity_at(&mut self, pos: Position) -> bool {
        let enemy_id = self.enemies().find(|a| a.position == pos).map(|a| a.id);
        if let Some(id) = enemy_id {
            self.remove_enemy(id);
            return true;
        }
        if let Some(id) = self.traps.iter().find(|t| t.position == pos).map(|t| t.id) {
            self.remove_trap(id);
            return true;
        }
        let before = self.waypoints.len();
        self.waypoints.retain(|w| *w != pos);
        before != self.waypoints.len()
    }

    // ===== traps, hazards, loot, effects =====

    pub fn traps(&self) -> &[Trap] {
        &self.traps
    }

    pub fn trap(&self, id: EntityId) -> Option<&Trap> {
        self.traps.iter().find(|t| t.id == id)
    }

    pub fn trap_mut(&mut self, id: EntityId) -> Option<&mut Trap> {
        self.traps.iter_mut().find(|t| t.id == id)
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn hazard_at(&self, pos: Position) -> Option<&Hazard> {
        self.hazards
            .iter()
            .find(|h| !h.is_expired() && h.position == pos)
    }

    /// Adds `hazard`, expiring any hazard already on its tile.
    ///
    /// Rejected on tiles that cannot be walked on.
    pub fn add_hazard(&mut self, hazard: Hazard) -> bool {
        if !self.grid.tile(hazard.position).is_traversable(NavDomain::Ground) {
            return false;
        }
        for existing in self.hazards.iter_mut() {
            if existing.position == hazard.position {
                existing.expire();
            }
        }
        self.record(GameEvent::HazardSpawned {
            position: hazard.position,
            source: hazard.source,
        });
        self.hazards.push(hazard);
        true
    }

    pub fn loot(&self) -> &[Loot] {
        &self.loot
    }

    pub fn add_loot(&mut self, loot: Loot) {
        self.loot.push(loot);
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }

    // ===== spatial lookup =====

    /// Every live entity on `pos`: loot, actors, hazards, traps, particles,
    /// then waypoints.
    pub fn entities_at(&self, pos: Position) -> Vec<EntityRef<'_>> {
        let mut out = Vec::new();
        out.extend(
            self.loot
                .iter()
                .filter(|l| !l.is_expired() && l.position == pos)
                .map(EntityRef::Loot),
        );
        out.extend(
            self.actors
                .iter()
                .filter(|a| !a.is_expired() && a.position == pos)
                .map(EntityRef::Actor),
        );
        out.extend(
            self.hazards
                .iter()
                .filter(|h| !h.is_expired() && h.position == pos)
                .map(EntityRef::Hazard),
        );
        out.extend(
            self.traps
                .iter()
                .filter(|t| !t.is_expired() && t.position == pos)
                .map(EntityRef::Trap),
        );
        for (key, particle) in self.effects.iter() {
            if self.particle_position(*key, particle) == Some(pos) {
                out.push(EntityRef::Particle(*key, particle));
            }
        }
        if self.waypoints.contains(&pos) {
            out.push(EntityRef::Waypoint(pos));
        }
        out
    }

    /// First entity on `pos`, optionally restricted to one kind.
    pub fn find_entity(&self, pos: Position, kind: Option<EntityKind>) -> Option<EntityRef<'_>> {
        self.entities_at(pos)
            .into_iter()
            .find(|e| kind.is_none_or(|k| e.kind() == k))
    }

    fn particle_position(&self, key: EffectKey, particle: &Particle) -> Option<Position> {
        match particle {
            Particle::Projectile(projectile) => Some(projectile.position()),
            Particle::SleepMarker => self.actor(key.0).map(|a| a.position),
        }
    }

    /// Total experience value of every enemy and trap on the board.
    pub fn exp_cost(&self) -> i32 {
        let enemies: i32 = self
            .enemies()
            .filter_map(|a| match a.death {
                DeathStyle::Reward { exp, .. } => Some(exp),
                DeathStyle::EndSession => None,
            })
            .sum();
        let traps: i32 = self.traps.iter().map(|t| t.exp_cost).sum();
        enemies + traps
    }
}

impl NavMap for Dungeon {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn is_passable(&self, pos: Position, domain: NavDomain) -> bool {
        Dungeon::is_passable(self, pos, domain)
    }

    fn has_hazard(&self, pos: Position) -> bool {
        self.hazard_at(pos).is_some()
    }

    fn hazard_penalty(&self) -> f64 {
        self.config.hazard_penalty
    }
}
