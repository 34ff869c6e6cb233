//! Domain data types.
//!
//! Everything here is plain data. The `ActorEntity` impls that give [`Order`] and [`Part`]
//! their behavior live next to their actors.

pub mod events;
pub mod order;
pub mod part;

pub use events::*;
pub use order::*;
pub use part::*;
