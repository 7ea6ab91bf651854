//! End-to-end scenarios against the public `solve` entry point, covering
//! the dominance rules (EA, TB, RB, LB-pruning, goal short-circuit) and the
//! infeasible-instance path. Priority lists are written bottom-to-top, the
//! same order `Instance::new` takes them in.

use brp::domain::Instance;
use brp::solve;
use std::time::Duration;

fn limit() -> Duration {
    Duration::from_secs(10)
}

#[test]
fn trivial_already_sorted() {
    let inst = Instance::new(3, vec![1, 1, 1], vec![vec![3], vec![2], vec![1]]).unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    assert_eq!(report.best_lb, 0);
    assert_eq!(report.best_ub, 0);
    assert_eq!(report.best_sol, Some(vec![]));
}

#[test]
fn one_blocking_block() {
    let inst = Instance::new(3, vec![2, 1], vec![vec![1, 2], vec![3]]).unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    assert_eq!(report.best_lb, 1);
    assert_eq!(report.best_ub, 1);
    let sol = report.best_sol.unwrap();
    assert_eq!(sol.len(), 1);
    assert_eq!(sol[0].pri, 2);
    assert_eq!(sol[0].src, 0);
    assert_eq!(sol[0].dst, 1);
}

#[test]
fn two_independent_blockers_need_two_relocations() {
    // stack 0: [1, 3] and stack 1: [2, 4] each have their own blocker; since
    // badness is local to a stack, no single relocation can clear both, but
    // relocating 4 onto the empty stack before 3 (so 3 lands on top of a
    // lower-quality 4) clears everything in exactly two moves.
    let inst = Instance::new(
        3,
        vec![2, 2, 0],
        vec![vec![1, 3], vec![2, 4], vec![]],
    )
    .unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    assert_eq!(report.best_ub, 2);
    assert_eq!(report.best_lb, report.best_ub);
}

#[test]
fn requires_lb4_above_n_bad() {
    let inst = Instance::new(3, vec![3, 1], vec![vec![1, 4, 3], vec![2]]).unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    assert!(report.best_ub >= 2);
    assert_eq!(report.best_lb, report.best_ub);
}

#[test]
fn empty_stack_rule_collapses_equivalent_destinations() {
    // Three empty destinations are interchangeable; only the leftmost is
    // ever actually enumerated, and the optimum is still found in one move.
    let inst = Instance::new(
        3,
        vec![2, 0, 0, 0],
        vec![vec![1, 2], vec![], vec![], vec![]],
    )
    .unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    assert_eq!(report.best_lb, 1);
    assert_eq!(report.best_ub, 1);
}

#[test]
fn infeasible_instance_returns_none() {
    // Both stacks completely full and bad on top: nowhere to relocate
    // either blocker.
    let inst = Instance::new(2, vec![2, 2], vec![vec![1, 2], vec![3, 4]]).unwrap();
    assert!(solve(&inst, limit()).is_none());
}

#[test]
fn path_applies_cleanly_to_the_root() {
    use brp::state::StateArena;

    let inst = Instance::new(3, vec![3, 1], vec![vec![1, 4, 3], vec![2]]).unwrap();
    let report = solve(&inst, limit()).expect("feasible");
    let sol = report.best_sol.expect("solution recorded");
    assert_eq!(sol.len(), report.best_ub);

    let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
    let s = arena.alloc_state();
    arena.init_state(s, &inst);
    let mut l = 0u32;
    while arena.is_retrievable(s) {
        arena.retrieve(s, l);
        l += 1;
    }
    for mv in &sol {
        assert_eq!(arena.top(s, mv.src).p, mv.pri);
        arena.relocate(s, mv.src, mv.dst, l);
        l += 1;
        while arena.is_retrievable(s) {
            arena.retrieve(s, l);
            l += 1;
        }
    }
    assert_eq!(arena.n_blocks(s), 0);
}
