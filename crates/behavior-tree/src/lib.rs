//! Stateless behavior tree nodes for turn-structured actor decisions.
//!
//! A tree is ticked once per actor turn against a mutable context that
//! borrows the world. Nodes hold no state of their own: anything that must
//! survive between turns lives in the context.
//!
//! - [`Behavior`]: core trait for all nodes
//! - [`Status`]: Success or Failure (no Running state)
//! - Leaves: implement [`Behavior`] directly on the context type
//! - Composites: [`Sequence`], [`Selector`]
//! - Decorators: [`AlwaysSucceed`]

pub mod behavior;
pub mod composite;
pub mod decorator;
pub mod status;

pub use behavior::Behavior;
pub use composite::{Selector, Sequence};
pub use decorator::AlwaysSucceed;
pub use status::Status;
