//! Nodes of the enemy behavior tree.
//!
//! Each node reads and writes the dungeon through [`EnemyTurn`]. Nodes that
//! cannot find their enemy fail.

use behavior_tree::{Behavior, Status};

use super::EnemyTurn;
use crate::actor::Actor;
use crate::pathfinding::find_path;
use crate::types::EntityId;

/// Starts the turn. Fails when the enemy cannot act (no action points,
/// asleep, dead).
pub struct BeginTurn;

impl Behavior<EnemyTurn<'_>> for BeginTurn {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        Status::from_bool(ctx.dungeon.begin_turn(ctx.entity, false))
    }
}

/// Re-routes to the same destination when the queued step became impassable.
pub struct RecoverPath;

impl Behavior<EnemyTurn<'_>> for RecoverPath {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let Some(actor) = ctx.actor() else {
            return Status::Failure;
        };
        let Some(path) = actor.mind().map(|m| m.path()) else {
            return Status::Failure;
        };
        let Some(next) = path.next_step() else {
            return Status::Success;
        };
        if ctx.dungeon.is_passable(next, actor.domain) {
            return Status::Success;
        }

        let rerouted = find_path(&*ctx.dungeon, &actor.mover(), path.destination());
        if let Some(mind) = ctx.mind_mut() {
            mind.path = rerouted;
        }
        Status::Success
    }
}

/// Looks for the player within sight. Sight grows by the bonus radius while
/// already chasing.
///
/// Succeeds when the player was spotted; pursuit is dropped otherwise.
pub struct Sense;

impl Behavior<EnemyTurn<'_>> for Sense {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let Some(actor) = ctx.actor() else {
            return Status::Failure;
        };
        let Some(mind) = actor.mind() else {
            return Status::Failure;
        };
        let range = if mind.is_chasing() {
            mind.sight_radius + mind.sight_bonus
        } else {
            mind.sight_radius
        };

        let spotted = ctx
            .dungeon
            .grid()
            .visible_tiles_from(actor.position, range)
            .into_iter()
            .find_map(|tile| {
                ctx.dungeon
                    .living_actor_at(tile.position)
                    .filter(|a| a.is_player())
                    .map(|a| a.position)
            });

        let Some(mind) = ctx.mind_mut() else {
            return Status::Failure;
        };
        match spotted {
            Some(position) => {
                mind.pursuit = Some(EntityId::PLAYER);
                mind.investigation = Some(position);
                Status::Success
            }
            None => {
                mind.pursuit = None;
                Status::Failure
            }
        }
    }
}

/// Picks this turn's destination.
///
/// Standing on the current waypoint moves the patrol on; standing on the
/// commanded target or the investigation point clears it. Priority is
/// pursuit, then investigation, then target, then patrol.
pub struct Arbitrate;

impl Behavior<EnemyTurn<'_>> for Arbitrate {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let Some(position) = ctx.actor().map(|a| a.position) else {
            return Status::Failure;
        };
        let pursued = ctx.pursued_position();
        let Some(mind) = ctx.mind_mut() else {
            return Status::Failure;
        };

        if mind.current_waypoint() == Some(position) {
            mind.advance_waypoint();
        }
        if mind.target == Some(position) {
            mind.target = None;
        }
        if mind.investigation == Some(position) {
            mind.investigation = None;
        }
        if pursued.is_none() {
            mind.pursuit = None;
        }

        let destination = pursued
            .or(mind.investigation)
            .or(mind.target)
            .or_else(|| mind.current_waypoint());
        ctx.destination = destination;
        Status::Success
    }
}

/// Replaces the path with a fresh A* route to the chosen destination.
pub struct PlanRoute;

impl Behavior<EnemyTurn<'_>> for PlanRoute {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let Some(mover) = ctx.actor().map(Actor::mover) else {
            return Status::Failure;
        };
        let path = find_path(&*ctx.dungeon, &mover, ctx.destination);
        let Some(mind) = ctx.mind_mut() else {
            return Status::Failure;
        };
        mind.path = path;
        Status::Success
    }
}

/// Attacks the pursued actor when it is adjacent (melee) or in range along a
/// clear line (ranged), spending the attack cost.
pub struct Engage;

impl Behavior<EnemyTurn<'_>> for Engage {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let Some(target) = ctx.pursued_position() else {
            return Status::Failure;
        };
        let Some(actor) = ctx.actor() else {
            return Status::Failure;
        };
        let Some(dir) = actor.position.direction_to(target) else {
            return Status::Failure;
        };

        let grid = ctx.dungeon.grid();
        let distance = grid.measure_distance(actor.position, target);
        let in_melee = actor.melee_capable && distance <= 1.0;
        let in_range = actor.has_ranged_attack()
            && distance <= f64::from(actor.attack_range)
            && grid.is_clear_shot(actor.position, target);
        if !in_melee && !in_range {
            return Status::Failure;
        }

        let cost = actor.attack_cost();
        ctx.dungeon.strike(ctx.entity, dir);
        if let Some(actor) = ctx.dungeon.actor_mut(ctx.entity) {
            actor.spend_action_points(cost);
        }
        Status::Success
    }
}

/// Takes the queued step if it is free. Costs one action point either way.
pub struct Advance;

impl Behavior<EnemyTurn<'_>> for Advance {
    fn tick(&self, ctx: &mut EnemyTurn) -> Status {
        let next = ctx.mind().and_then(|m| m.path().next_step());
        if let Some(step) = next
            && ctx.dungeon.try_move_to(ctx.entity, step)
            && let Some(mind) = ctx.mind_mut()
        {
            mind.path.pop_step();
        }
        if let Some(actor) = ctx.dungeon.actor_mut(ctx.entity) {
            actor.spend_action_points(1);
        }
        Status::Success
    }
}
