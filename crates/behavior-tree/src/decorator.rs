//! Decorator nodes.

use crate::{Behavior, Status};

/// Ticks its child and reports `Success` whatever the child returned.
///
/// Used for steps that must run every turn but whose outcome should not stop
/// an enclosing [`Sequence`](crate::Sequence).
pub struct AlwaysSucceed<'n, C> {
    child: Box<dyn Behavior<C> + 'n>,
}

impl<'n, C> AlwaysSucceed<'n, C> {
    pub fn new(child: Box<dyn Behavior<C> + 'n>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<'_, C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountThenFail;

    impl Behavior<u32> for CountThenFail {
        fn tick(&self, n: &mut u32) -> Status {
            *n += 1;
            Status::Failure
        }
    }

    #[test]
    fn swallows_child_failure_but_keeps_side_effects() {
        let node: AlwaysSucceed<'_, u32> = AlwaysSucceed::new(Box::new(CountThenFail));
        let mut n = 0;
        assert_eq!(node.tick(&mut n), Status::Success);
        assert_eq!(n, 1);
    }
}
