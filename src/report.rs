//! The solve summary returned to callers: bounds at start and end of
//! search, the best solution found, and basic performance counters.
//!
//! Grounded on `original_source/src/report.c`/`report.h` (`report_t`,
//! `new_report`); `serde::Serialize` is added so `--json` output (see
//! `bin/brp-solve.rs`) can dump it directly, the way the teacher crate
//! serializes its own result types for its API layer.

use crate::domain::mv::{format_path, Move};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// LB4 bound at the root, after draining any initially-retrievable
    /// blocks.
    pub init_lb: i32,
    /// Length of the first MinMax solution, used to size history/branch
    /// pools before search starts.
    pub init_ub: usize,
    /// Final proven lower bound (equals `best_ub` iff optimality was
    /// proved before the time limit).
    pub best_lb: i32,
    pub best_ub: usize,
    /// `None` only if the instance has no feasible solution at all; a
    /// `Some` that's merely suboptimal still happens when the time limit
    /// is hit before `best_lb` catches up to `best_ub`.
    pub best_sol: Option<Vec<Move>>,
    pub time_to_best_lb: f64,
    pub time_to_best_ub: f64,
    pub time_used: f64,
    pub n_nodes: u64,
    pub n_probe: u64,
}

impl Report {
    /// The report for an instance that needed no relocations at all: every
    /// block was already retrievable in priority order.
    pub fn trivial() -> Self {
        Report {
            init_lb: 0,
            init_ub: 0,
            best_lb: 0,
            best_ub: 0,
            best_sol: Some(Vec::new()),
            time_to_best_lb: 0.0,
            time_to_best_ub: 0.0,
            time_used: 0.0,
            n_nodes: 0,
            n_probe: 0,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.best_lb == self.best_ub as i32
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "init_lb = {}, init_ub = {}", self.init_lb, self.init_ub)?;
        writeln!(f, "best_lb = {}, best_ub = {}", self.best_lb, self.best_ub)?;
        writeln!(f, "solution = {}", format_path(self.best_sol.as_deref()))?;
        writeln!(
            f,
            "time_to_best_lb = {:.3}, time_to_best_ub = {:.3}, time_used = {:.3}",
            self.time_to_best_lb, self.time_to_best_ub, self.time_used
        )?;
        write!(f, "n_nodes = {}, n_probe = {}", self.n_nodes, self.n_probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_report_is_optimal() {
        assert!(Report::trivial().is_optimal());
    }

    #[test]
    fn serializes_to_json() {
        let report = Report::trivial();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"best_lb\":0"));
    }
}
