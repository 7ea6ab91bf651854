//! Configuration state: the arena, its slot records, and the invariants
//! that make lower/upper bound computation and dominance pruning cheap.

mod arena;
mod slot;

pub use arena::{State, StateArena};
pub use slot::Slot;
