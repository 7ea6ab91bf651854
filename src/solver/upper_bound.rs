//! MinMax: the greedy primal heuristic from spec.md §4.5, used both to seed
//! the initial incumbent and to probe promising nodes during search.
//!
//! Grounded on `original_source/main/upper_bound.c`. The original signals
//! failure with `INT_MAX`; here that's `None`. `state` is mutated in place
//! by design, matching the original's contract — callers that need the
//! state afterwards must pass a scratch copy.

use crate::domain::mv::Move;
use crate::state::{State, StateArena};

/// Drains `state` by always retrieving when possible and otherwise
/// relocating the blocking top onto the best-looking destination, appending
/// moves to `path` starting at index `len`. Returns the total path length on
/// success, or `None` if it can prove no completion exists within
/// `max_len` moves.
///
/// `path` is grown as needed; existing entries before `len` are untouched.
pub fn minmax(
    arena: &mut StateArena,
    state: State,
    path: &mut Vec<Move>,
    len: usize,
    max_len: usize,
) -> Option<usize> {
    if len + arena.n_bad(state) > max_len {
        return None;
    }

    let n_stacks = arena.n_stacks();
    let n_tiers = arena.n_tiers();
    let mut len = len;

    while arena.n_bad(state) > 0 {
        while arena.is_retrievable(state) {
            arena.retrieve(state, len as u32);
        }

        let src = arena.target_stack(state);
        let h_src = arena.height(state, src);
        let n_empty_slots = (n_stacks - 1) * n_tiers - (arena.n_blocks(state) - h_src);
        if arena.slot(state, src, h_src).b as usize > n_empty_slots {
            return None;
        }

        let pri = arena.slot(state, src, h_src).p;

        let (i_max, q_max) = arena
            .highest_quality_with_room(state)
            .expect("n_bad > 0 implies some stack still has room");

        if pri > q_max && len + arena.n_bad(state) == max_len {
            return None;
        }

        let list = arena.list(state);
        let dst = if pri <= q_max {
            list[1..]
                .iter()
                .copied()
                .find(|&s| arena.height(state, s) < n_tiers && pri <= arena.top(state, s).q)
                .expect("q_max witness guarantees some destination qualifies")
        } else {
            let mut d = list[i_max];
            if arena.height(state, d) == n_tiers - 1 {
                for &s in list[1..i_max].iter().rev() {
                    if arena.height(state, s) < n_tiers {
                        d = s;
                        break;
                    }
                }
            }
            d
        };

        if path.len() <= len {
            path.resize(
                len + 1,
                Move {
                    pri: 0,
                    src: 0,
                    dst: 0,
                },
            );
        }
        path[len] = Move {
            pri,
            src,
            dst,
        };
        len += 1;
        arena.relocate(state, src, dst, len as u32);
    }

    Some(len)
}
