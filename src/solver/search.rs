//! Iterative-deepening branch-and-bound: the driver that ties the state
//! arena, LB4, and MinMax together into a complete solve.
//!
//! Grounded on `original_source/main/algorithm.c`. The original's file-scope
//! `static` scratch buffers become fields of [`Solver`]; its raw `node_t`/
//! `branch_t` arrays become [`HistNode`]/[`Branch`] vectors sized once up
//! front from the MinMax-derived `max_depth`, exactly as the original sizes
//! `hist`/`pool`.

use crate::domain::instance::Instance;
use crate::domain::mv::Move;
use crate::report::Report;
use crate::solver::lower_bound::{lb4, LowerBoundScratch};
use crate::solver::upper_bound::minmax;
use crate::state::{State, StateArena};
use crate::timer::Timer;
use std::time::Duration;
use tracing::debug;

struct HistNode {
    lb: i32,
    state: State,
}

struct Branch {
    dst: usize,
    q_dst: i32,
    child_lb: i32,
    child_state: State,
}

const fn zero_move() -> Move {
    Move { pri: 0, src: 0, dst: 0 }
}

/// Owns every piece of mutable state the search touches across the whole
/// iterative-deepening run: the configuration arena, history/branch pools,
/// and the running incumbent.
pub struct Solver {
    arena: StateArena,
    n_stacks: usize,
    n_tiers: usize,

    path: Vec<Move>,
    hist: Vec<HistNode>,
    temp_state: State,
    pool: Vec<Branch>,

    probe_state: State,
    lb_scratch: LowerBoundScratch,

    timer: Timer,
    start_time: f64,
    end_time: f64,
    n_timer: u64,
    timer_cycle: u64,

    best_lb: i32,
    best_ub: usize,
    best_sol: Vec<Move>,
    time_to_best_lb: f64,
    time_to_best_ub: f64,
    n_nodes: u64,
    n_probe: u64,
}

impl Solver {
    fn debug_info(&self, status: &str) {
        debug!(
            "[{status}] best_lb = {} @ {:.3} / best_ub = {} @ {:.3} / time = {:.3} / \
             nodes = {} / probe = {}",
            self.best_lb,
            self.time_to_best_lb - self.start_time,
            self.best_ub,
            self.time_to_best_ub - self.start_time,
            self.timer.elapsed_secs() - self.start_time,
            self.n_nodes,
            self.n_probe,
        );
    }

    fn search(&mut self, level: usize, pool_offset: usize) -> bool {
        self.n_nodes += 1;

        self.n_timer += 1;
        if self.n_timer == self.timer_cycle {
            self.n_timer = 0;
            if self.timer.elapsed_secs() >= self.end_time {
                return true;
            }
            self.debug_info("running");
        }

        let curr_lb = self.hist[level].lb;
        let curr_state = self.hist[level].state;

        let sn = self.arena.target_stack(curr_state);
        let pn = self.arena.top(curr_state, sn).p;

        let (_, q_max) = self
            .arena
            .highest_quality_with_room(curr_state)
            .expect("a node is only ever expanded while some stack has room");

        let n_bad = self.arena.n_bad(curr_state) as i32;
        let bad_term = (pn > q_max) as i32;
        let extra = (curr_lb > n_bad && pn > q_max) as i32;
        if level as i32 + curr_lb + bad_term - extra > self.best_lb {
            return false;
        }

        let mut size = 0usize;
        let mut first_dn = true;
        let mut first_empty = true;

        for dn in 0..self.n_stacks {
            if dn == sn || self.arena.height(curr_state, dn) == self.n_tiers {
                continue;
            }

            self.set_path(level, Move { pri: pn, src: sn, dst: dn });

            let q_dn = self.arena.top(curr_state, dn).q;
            if n_bad - 1 + (pn > q_dn) as i32 == 0 {
                self.best_ub = level + 1;
                self.record_best_sol();
                self.time_to_best_ub = self.timer.elapsed_secs();
                self.debug_info("goal");
                return true;
            }

            if self.arena.height(curr_state, dn) == 0 {
                if first_empty {
                    first_empty = false;
                } else {
                    continue; // EA: only the leftmost empty stack is a candidate
                }
            }

            if self.arena.last_change_time(curr_state, dn) < self.arena.top(curr_state, sn).l {
                continue; // TB: this relocation would just undo a prior one
            }

            let extra_dn = (curr_lb > n_bad && pn > q_dn) as i32;
            if level as i32 + curr_lb + (pn > q_dn) as i32 - extra_dn > self.best_lb {
                continue;
            }

            if first_dn {
                first_dn = false;
                let next = self.hist[level + 1].state;
                self.arena.copy_body(next, curr_state);
                self.arena.copy_head(self.temp_state, curr_state);
                let mut temp = self.temp_state;
                self.arena.reuse_body(&mut temp, next);
                self.temp_state = temp;
                self.arena.move_out(self.temp_state, sn, (level + 1) as u32);
            }

            let mut child_state = self.pool[pool_offset + size].child_state;
            self.arena.copy_head(child_state, self.temp_state);
            self.arena.reuse_body(&mut child_state, self.hist[level + 1].state);
            self.arena.move_in(child_state, dn, pn, (level + 1) as u32);
            self.pool[pool_offset + size].child_state = child_state;

            if self.dominated_on_retrieval(child_state, level) {
                continue;
            }

            let budget = self.best_lb - level as i32 - self.arena.n_bad(child_state) as i32;
            let child_lb = lb4(&self.arena, child_state, budget, &mut self.lb_scratch);

            if level as i32 + 1 + child_lb > self.best_lb {
                continue;
            }

            if level as i32 + 1 + child_lb == self.best_lb - 1 {
                self.n_probe += 1;
                self.arena.copy_state(self.probe_state, child_state);
                let new_len = minmax(
                    &mut self.arena,
                    self.probe_state,
                    &mut self.path,
                    level + 1,
                    self.best_ub - 1,
                );
                if let Some(new_len) = new_len {
                    self.best_ub = new_len;
                    self.record_best_sol();
                    self.time_to_best_ub = self.timer.elapsed_secs();
                    self.debug_info("update");
                    if self.best_lb == self.best_ub as i32 {
                        return true;
                    }
                }
            }

            self.pool[pool_offset + size].dst = dn;
            self.pool[pool_offset + size].q_dst = q_dn;
            self.pool[pool_offset + size].child_lb = child_lb;
            size += 1;
        }

        if size > 0 {
            self.pool[pool_offset..pool_offset + size].sort_by(|a, b| {
                a.child_lb
                    .cmp(&b.child_lb)
                    .then_with(|| b.q_dst.cmp(&a.q_dst))
            });

            for i in 0..size {
                let dn = self.pool[pool_offset + i].dst;
                self.set_path(level, Move { pri: pn, src: sn, dst: dn });

                self.hist[level + 1].lb = self.pool[pool_offset + i].child_lb;
                let mut next_state = self.hist[level + 1].state;
                self.arena
                    .reuse_head(&mut next_state, self.pool[pool_offset + i].child_state);
                self.hist[level + 1].state = next_state;

                if self.arena.height(next_state, dn) == self.arena.height(curr_state, dn) + 1 {
                    let t = self.arena.height(next_state, dn);
                    self.arena.set_item(next_state, dn, t, pn, (level + 1) as u32);
                }

                if self.search(level + 1, pool_offset + size) {
                    return true;
                }
            }
        }

        false
    }

    /// Drains retrievable blocks from `child_state`, stopping (and
    /// reporting dominated) the moment the RB rule fires: some
    /// lower-numbered stack untouched since before the retrieved block's
    /// last move could have absorbed it just as well.
    fn dominated_on_retrieval(&mut self, child_state: State, level: usize) -> bool {
        while self.arena.is_retrievable(child_state) {
            let s_min = self.arena.target_stack(child_state);
            let l = self.arena.top(child_state, s_min).l;

            if l > 0 {
                let h_min = self.arena.height(child_state, s_min);
                for d in 0..s_min {
                    if self.arena.last_change_time(child_state, d) < l
                        && self.arena.height(child_state, d) <= h_min - 1
                    {
                        return true;
                    }
                }
            }

            self.arena.retrieve(child_state, (level + 1) as u32);
        }
        false
    }

    fn set_path(&mut self, level: usize, mv: Move) {
        if self.path.len() <= level {
            self.path.resize(level + 1, zero_move());
        }
        self.path[level] = mv;
    }

    fn record_best_sol(&mut self) {
        self.best_sol.clear();
        self.best_sol.extend_from_slice(&self.path[0..self.best_ub]);
    }
}

/// Solves `inst` by iterative-deepening branch-and-bound, stopping once an
/// optimal solution is proved or `time_limit` elapses. Returns `None` when
/// the instance has no feasible solution at all (MinMax cannot complete it
/// even unbounded).
pub fn solve(inst: &Instance, time_limit: Duration) -> Option<Report> {
    let n_stacks = inst.n_stacks;
    let n_tiers = inst.n_tiers;
    let mut arena = StateArena::new(n_stacks, n_tiers);

    let timer = Timer::start();
    let start_time = timer.elapsed_secs();
    let end_time = start_time + time_limit.as_secs_f64();

    let root_state = arena.alloc_state();
    arena.init_state(root_state, inst);
    while arena.is_retrievable(root_state) {
        arena.retrieve(root_state, 0);
    }
    if arena.n_blocks(root_state) == 0 {
        return Some(Report::trivial());
    }

    let probe_state = arena.alloc_state();
    arena.copy_state(probe_state, root_state);
    let mut scratch_path = Vec::new();
    let max_depth = minmax(&mut arena, probe_state, &mut scratch_path, 0, usize::MAX)?;

    let mut lb_scratch = LowerBoundScratch::new(n_stacks, n_tiers);
    let root_lb = lb4(&arena, root_state, i32::MAX, &mut lb_scratch);

    let mut hist = Vec::with_capacity(max_depth + 1);
    hist.push(HistNode { lb: root_lb, state: root_state });
    for _ in 1..=max_depth {
        hist.push(HistNode { lb: 0, state: arena.alloc_state() });
    }
    let temp_state = arena.alloc_state();

    let pool_size = max_depth * (n_stacks - 1).max(1);
    let mut pool = Vec::with_capacity(pool_size);
    for _ in 0..pool_size {
        pool.push(Branch {
            dst: 0,
            q_dst: 0,
            child_lb: 0,
            child_state: arena.alloc_state(),
        });
    }

    arena.copy_state(probe_state, root_state);
    let mut best_sol = Vec::new();
    let best_ub = minmax(&mut arena, probe_state, &mut best_sol, 0, usize::MAX)
        .expect("root feasibility was already proved above");
    best_sol.truncate(best_ub);

    let mut solver = Solver {
        arena,
        n_stacks,
        n_tiers,
        path: vec![zero_move(); max_depth.max(1)],
        hist,
        temp_state,
        pool,
        probe_state,
        lb_scratch,
        timer,
        start_time,
        end_time,
        n_timer: 0,
        timer_cycle: crate::config::constant::TIMER_POLL_CYCLE,
        best_lb: root_lb,
        best_ub,
        best_sol,
        time_to_best_lb: start_time,
        time_to_best_ub: start_time,
        n_nodes: 0,
        n_probe: 0,
    };

    solver.debug_info("start");
    while solver.best_lb < solver.best_ub as i32 {
        if solver.search(0, 0) {
            break;
        }
        solver.best_lb += 1;
        solver.time_to_best_lb = solver.timer.elapsed_secs();
        solver.debug_info("deepen");
    }
    solver.debug_info("end");

    Some(Report {
        init_lb: root_lb,
        init_ub: max_depth,
        best_lb: solver.best_lb,
        best_ub: solver.best_ub,
        best_sol: Some(solver.best_sol),
        time_to_best_lb: solver.time_to_best_lb - start_time,
        time_to_best_ub: solver.time_to_best_ub - start_time,
        time_used: solver.timer.elapsed_secs() - start_time,
        n_nodes: solver.n_nodes,
        n_probe: solver.n_probe,
    })
}
