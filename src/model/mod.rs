//! Pure data structures for the cart and the realtime channel.
//!
//! Nothing in this module talks to a collaborator: pricing, history eviction and
//! state predicates are plain functions over owned data, so they can be tested
//! without spawning a single actor.

pub mod cart;
pub mod event;
pub mod identity;

pub use cart::*;
pub use event::*;
pub use identity::*;
