//! Iterative-deepening branch-and-bound solver for the block relocation
//! problem (container pre-marshalling): given stacks of prioritized blocks,
//! find the minimum number of relocations that lets every block be
//! retrieved in priority order.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod solver;
pub mod state;
pub mod timer;

pub use error::{BrpError, InstanceError};
pub use report::Report;
pub use solver::solve;
