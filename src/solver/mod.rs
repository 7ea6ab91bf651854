//! Branch-and-bound search plus its two bounding procedures.

mod lower_bound;
mod search;
mod upper_bound;

pub use lower_bound::{lb4, LowerBoundScratch};
pub use search::solve;
pub use upper_bound::minmax;
