//! Solver-wide tunable constants, kept in one place the way the original
//! module-level parameters were grouped, but without mutable globals:
//! everything here is a `const` consumed by value.
pub mod constant {
    /// Default `--time_limit` in seconds when the CLI flag is not given.
    pub const DEFAULT_TIME_LIMIT_SECS: u64 = 1800;

    /// Default `--input` path when the CLI flag is not given.
    pub const DEFAULT_INPUT_PATH: &str = "data/test.txt";

    /// Number of node expansions between wall-clock/CPU-time polls.
    pub const TIMER_POLL_CYCLE: u64 = 1_000_000;
}
