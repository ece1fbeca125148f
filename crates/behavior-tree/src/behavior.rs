//! Core behavior trait.

use crate::Status;

/// A node that can be evaluated against a context.
///
/// The context is usually a short-lived view over the world (for example an
/// actor id plus a mutable borrow of the board) rather than a long-lived
/// blackboard, so trees are cheap to build for a single turn.
pub trait Behavior<C>: Send + Sync {
    /// Evaluate this node once.
    fn tick(&self, ctx: &mut C) -> Status;
}

impl<C> Behavior<C> for Box<dyn Behavior<C> + '_> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
