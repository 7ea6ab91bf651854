pub mod instance;
pub mod mv;

pub use instance::Instance;
pub use mv::{format_path, Move};
