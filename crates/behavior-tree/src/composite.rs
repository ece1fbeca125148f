//! Composite nodes: [`Sequence`] (AND) and [`Selector`] (OR).

use crate::{Behavior, Status};

/// Ticks children left to right, stopping at the first failure.
pub struct Sequence<'n, C> {
    children: Vec<Box<dyn Behavior<C> + 'n>>,
}

impl<'n, C> Sequence<'n, C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C> + 'n>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Ticks children left to right, stopping at the first success.
///
/// Child order is priority order: the first branch whose guard holds wins.
pub struct Selector<'n, C> {
    children: Vec<Box<dyn Behavior<C> + 'n>>,
}

impl<'n, C> Selector<'n, C> {
    /// # Panics
    ///
    /// Panics if `children` is empty.
    pub fn new(children: Vec<Box<dyn Behavior<C> + 'n>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}
