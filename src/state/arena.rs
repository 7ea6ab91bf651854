//! The mutable configuration plus its derived indices, modelled as an
//! arena of fixed-size records rather than the original's per-node
//! `malloc`/pointer-aliasing scheme.
//!
//! Grounded on `original_source/src/state.c` / `original_source/base/state.c`
//! (the "main" variant per the REDESIGN FLAGS note: incremental `list`/
//! `rank`, no `RULES_BY_TANAKA`). A [`State`] is a value type: a pair of
//! indices into a [`StateArena`]'s `heads` and `bodies` vectors. Retargeting
//! a handle's `head`/`body` index *is* `reuse_state_head`/`reuse_state_body`
//! from the original — no pointer surgery, just swapping an index, per the
//! "ownership by index" guidance in spec.md §9. Two handles with equal
//! `body` indices observe each other's writes through that body, which is
//! precisely the aliasing contract described in spec.md §5.

use super::slot::Slot;
use crate::domain::instance::Instance;

/// The head: heights, the quality-sorted stack order, and per-stack
/// bookkeeping. Always owned (never itself aliased byte-for-byte; a whole
/// head index is swapped instead, see [`StateArena::reuse_head`]).
#[derive(Debug, Clone)]
struct Head {
    n_blocks: usize,
    n_bad: usize,
    h: Vec<usize>,
    list: Vec<usize>,
    rank: Vec<usize>,
    last_change_time: Vec<u32>,
}

impl Head {
    fn new(n_stacks: usize) -> Self {
        Head {
            n_blocks: 0,
            n_bad: 0,
            h: vec![0; n_stacks],
            list: (0..n_stacks).collect(),
            rank: (0..n_stacks).collect(),
            last_change_time: vec![0; n_stacks],
        }
    }
}

/// The body: the per-slot `(p, q, b, l)` configuration, `conf[s][t]` for
/// `t` in `0..=n_tiers`.
#[derive(Debug, Clone)]
struct Body {
    conf: Vec<Vec<Slot>>,
}

impl Body {
    fn new(n_stacks: usize, n_tiers: usize) -> Self {
        Body {
            conf: vec![vec![Slot::default(); n_tiers + 1]; n_stacks],
        }
    }
}

/// A lightweight handle into a [`StateArena`]: which head record and which
/// body record this "state" currently refers to. `Copy` because it is just
/// two indices — the arena owns all the actual memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    head: usize,
    body: usize,
}

/// Owns every head and body record used by the solver. One arena is created
/// per `solve()` call and lives for its duration.
pub struct StateArena {
    n_stacks: usize,
    n_tiers: usize,
    heads: Vec<Head>,
    bodies: Vec<Body>,
}

impl StateArena {
    pub fn new(n_stacks: usize, n_tiers: usize) -> Self {
        StateArena {
            n_stacks,
            n_tiers,
            heads: Vec::new(),
            bodies: Vec::new(),
        }
    }

    pub fn n_stacks(&self) -> usize {
        self.n_stacks
    }

    pub fn n_tiers(&self) -> usize {
        self.n_tiers
    }

    /// Allocates a fresh head record, returning its index.
    pub fn alloc_head(&mut self) -> usize {
        self.heads.push(Head::new(self.n_stacks));
        self.heads.len() - 1
    }

    /// Allocates a fresh body record, returning its index.
    pub fn alloc_body(&mut self) -> usize {
        self.bodies.push(Body::new(self.n_stacks, self.n_tiers));
        self.bodies.len() - 1
    }

    /// Allocates both a head and a body and bundles them into a [`State`].
    pub fn alloc_state(&mut self) -> State {
        State {
            head: self.alloc_head(),
            body: self.alloc_body(),
        }
    }

    /// A head-owning state whose body is not yet meaningful; the caller
    /// must point it at a real body (via [`Self::reuse_body`]) before use.
    pub fn alloc_head_only(&mut self) -> State {
        let head = self.alloc_head();
        State { head, body: 0 }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn n_blocks(&self, s: State) -> usize {
        self.heads[s.head].n_blocks
    }

    pub fn n_bad(&self, s: State) -> usize {
        self.heads[s.head].n_bad
    }

    pub fn height(&self, s: State, stack: usize) -> usize {
        self.heads[s.head].h[stack]
    }

    pub fn heights(&self, s: State) -> &[usize] {
        &self.heads[s.head].h
    }

    pub fn list(&self, s: State) -> &[usize] {
        &self.heads[s.head].list
    }

    pub fn rank(&self, s: State, stack: usize) -> usize {
        self.heads[s.head].rank[stack]
    }

    pub fn last_change_time(&self, s: State, stack: usize) -> u32 {
        self.heads[s.head].last_change_time[stack]
    }

    pub fn slot(&self, s: State, stack: usize, tier: usize) -> Slot {
        self.bodies[s.body].conf[stack][tier]
    }

    /// The slot at the current top of `stack` (tier `h[stack]`).
    pub fn top(&self, s: State, stack: usize) -> Slot {
        let t = self.height(s, stack);
        self.slot(s, stack, t)
    }

    /// `true` iff there is a block to retrieve and it is not blocked: the
    /// globally-minimum-top stack `list[0]` has a non-bad top.
    pub fn is_retrievable(&self, s: State) -> bool {
        self.n_blocks(s) > 0 && {
            let target = self.list(s)[0];
            self.top(s, target).b == 0
        }
    }

    /// The target stack: `list[0]`, the stack whose top priority is the
    /// global minimum.
    pub fn target_stack(&self, s: State) -> usize {
        self.list(s)[0]
    }

    /// The highest `q[s][h[s]]` among non-full stacks, per the `q_max`
    /// computation in spec.md §4.2/§4.3/§4.4 (scanning `list` from the
    /// back for the first stack with room).
    pub fn q_max(&self, s: State) -> i32 {
        let head = &self.heads[s.head];
        for &stack in head.list.iter().rev() {
            if head.h[stack] < self.n_tiers {
                return self.bodies[s.body].conf[stack][head.h[stack]].q;
            }
        }
        unreachable!("q_max called with every stack full")
    }

    /// Index into `list` (from the back) and `q` of the highest-quality
    /// stack with room, or `None` if every stack is full.
    pub fn highest_quality_with_room(&self, s: State) -> Option<(usize, i32)> {
        let head = &self.heads[s.head];
        for i in (0..self.n_stacks).rev() {
            let stack = head.list[i];
            if head.h[stack] < self.n_tiers {
                return Some((i, self.bodies[s.body].conf[stack][head.h[stack]].q));
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    fn compare_stacks(&self, s: State, s1: usize, s2: usize) -> i32 {
        let h = &self.heads[s.head].h;
        self.bodies[s.body].conf[s1][h[s1]].q - self.bodies[s.body].conf[s2][h[s2]].q
    }

    /// Shifts `stack` left within `list` until invariant 3 holds again
    /// (used when `stack`'s quality just decreased).
    fn adjust_left(&mut self, s: State, stack: usize) {
        let mut i = self.heads[s.head].rank[stack];
        while i > 0 {
            let prev = self.heads[s.head].list[i - 1];
            if self.compare_stacks(s, stack, prev) < 0 {
                let head = &mut self.heads[s.head];
                head.list[i] = prev;
                head.rank[prev] = i;
                i -= 1;
            } else {
                break;
            }
        }
        let head = &mut self.heads[s.head];
        head.list[i] = stack;
        head.rank[stack] = i;
    }

    /// Shifts `stack` right within `list` until invariant 3 holds again
    /// (used when `stack`'s quality just increased).
    fn adjust_right(&mut self, s: State, stack: usize) {
        let mut i = self.heads[s.head].rank[stack];
        while i < self.n_stacks - 1 {
            let next = self.heads[s.head].list[i + 1];
            if self.compare_stacks(s, stack, next) > 0 {
                let head = &mut self.heads[s.head];
                head.list[i] = next;
                head.rank[next] = i;
                i += 1;
            } else {
                break;
            }
        }
        let head = &mut self.heads[s.head];
        head.list[i] = stack;
        head.rank[stack] = i;
    }

    /// Writes `p[s][t]`, deriving `q`/`b` from `(s, t-1)`, and stamps `l`.
    pub fn set_item(&mut self, s: State, stack: usize, tier: usize, p: i32, l: u32) {
        let below = self.bodies[s.body].conf[stack][tier - 1];
        self.bodies[s.body].conf[stack][tier] = Slot::derive(below, p, l);
    }

    /// Populates a freshly allocated state from an [`Instance`] and
    /// restores invariant 3. `last_change_time` is left at 0 everywhere.
    pub fn init_state(&mut self, s: State, inst: &Instance) {
        self.heads[s.head].n_blocks = inst.n_blocks;
        self.heads[s.head].n_bad = 0;
        for stack in 0..self.n_stacks {
            self.heads[s.head].h[stack] = inst.h[stack];
            self.bodies[s.body].conf[stack][0] = Slot::sentinel(inst.max_prio);
            for tier in 1..=inst.h[stack] {
                self.set_item(s, stack, tier, inst.priority(stack, tier), 0);
                if self.bodies[s.body].conf[stack][tier].b > 0 {
                    self.heads[s.head].n_bad += 1;
                }
            }
            self.heads[s.head].list[stack] = stack;
            self.heads[s.head].rank[stack] = stack;
            self.adjust_left(s, stack);
            self.heads[s.head].last_change_time[stack] = 0;
        }
    }

    /// Pops the top block of `stack` (the `s` half of a relocation).
    pub fn move_out(&mut self, s: State, stack: usize, l: u32) {
        self.heads[s.head].h[stack] -= 1;
        let popped = self.bodies[s.body].conf[stack][self.heads[s.head].h[stack] + 1];
        if popped.b > 0 {
            self.heads[s.head].n_bad -= 1;
            self.adjust_left(s, stack);
        } else {
            self.adjust_right(s, stack);
        }
        self.heads[s.head].last_change_time[stack] = l;
    }

    /// Pushes `p` onto the top of `stack` (the `d` half of a relocation).
    pub fn move_in(&mut self, s: State, stack: usize, p: i32, l: u32) {
        self.heads[s.head].h[stack] += 1;
        let t = self.heads[s.head].h[stack];
        self.set_item(s, stack, t, p, l);
        if self.bodies[s.body].conf[stack][t].b > 0 {
            self.heads[s.head].n_bad += 1;
            self.adjust_right(s, stack);
        } else {
            self.adjust_left(s, stack);
        }
        self.heads[s.head].last_change_time[stack] = l;
    }

    /// Atomic pop-from-`src`/push-onto-`dst`.
    pub fn relocate(&mut self, s: State, src: usize, dst: usize, l: u32) {
        let p = self.top(s, src).p;
        self.move_out(s, src, l);
        self.move_in(s, dst, p, l);
    }

    /// Removes the target block. Only valid when [`Self::is_retrievable`].
    pub fn retrieve(&mut self, s: State, l: u32) {
        let stack = self.list(s)[0];
        self.heads[s.head].n_blocks -= 1;
        self.heads[s.head].h[stack] -= 1;
        self.adjust_right(s, stack);
        self.heads[s.head].last_change_time[stack] = l;
    }

    // ------------------------------------------------------------------
    // Copy / reuse
    // ------------------------------------------------------------------

    pub fn copy_head(&mut self, dst: State, src: State) {
        self.heads[dst.head] = self.heads[src.head].clone();
    }

    pub fn copy_body(&mut self, dst: State, src: State) {
        self.bodies[dst.body] = self.bodies[src.body].clone();
    }

    pub fn copy_state(&mut self, dst: State, src: State) {
        self.copy_head(dst, src);
        self.copy_body(dst, src);
    }

    /// Retargets `dst`'s head index to `src`'s. Both handles now observe
    /// the same head record.
    pub fn reuse_head(&self, dst: &mut State, src: State) {
        dst.head = src.head;
    }

    /// Retargets `dst`'s body index to `src`'s. Both handles now observe
    /// the same body record — the aliasing contract of spec.md §5.
    pub fn reuse_body(&self, dst: &mut State, src: State) {
        dst.body = src.body;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_instance() -> Instance {
        // stack 0: [1, 3] bottom-to-top; stack 1: [2, 4]; stack 2: empty
        Instance::new(2, vec![2, 2, 0], vec![vec![1, 3], vec![2, 4], vec![]]).unwrap()
    }

    #[test]
    fn init_state_establishes_invariants() {
        let inst = small_instance();
        let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
        let s = arena.alloc_state();
        arena.init_state(s, &inst);

        assert_eq!(arena.n_blocks(s), 4);
        assert_eq!(arena.slot(s, 0, 0).q, inst.max_prio + 1);
        assert_eq!(arena.slot(s, 0, 1).q, 1);
        assert_eq!(arena.slot(s, 0, 2).q, 1);
        assert_eq!(arena.slot(s, 0, 2).b, 1); // 3 sits above 1: bad
        assert_eq!(arena.slot(s, 1, 2).b, 1); // 4 sits above 2: also bad
        assert_eq!(arena.n_bad(s), 2);
    }

    #[test]
    fn list_sorted_ascending_by_top_quality() {
        let inst = small_instance();
        let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
        let s = arena.alloc_state();
        arena.init_state(s, &inst);
        let list = arena.list(s).to_vec();
        for w in list.windows(2) {
            let qa = arena.top(s, w[0]).q;
            let qb = arena.top(s, w[1]).q;
            assert!(qa <= qb);
        }
    }

    #[test]
    fn relocate_then_reverse_restores_configuration() {
        let inst = small_instance();
        let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
        let s = arena.alloc_state();
        arena.init_state(s, &inst);

        let before_p: Vec<Vec<i32>> = (0..inst.n_stacks)
            .map(|st| {
                (0..=inst.n_tiers)
                    .map(|t| arena.slot(s, st, t).p)
                    .collect()
            })
            .collect();
        let before_h = arena.heights(s).to_vec();

        arena.relocate(s, 0, 2, 1);
        arena.relocate(s, 2, 0, 2);

        for st in 0..inst.n_stacks {
            for t in 0..=inst.n_tiers {
                if t <= before_h[st] {
                    assert_eq!(arena.slot(s, st, t).p, before_p[st][t]);
                }
            }
        }
        assert_eq!(arena.heights(s), before_h.as_slice());
    }

    #[test]
    fn retrieve_drains_sorted_order() {
        // stacks: [3], [2], [1] — already sorted, all retrievable in order.
        let inst = Instance::new(3, vec![1, 1, 1], vec![vec![3], vec![2], vec![1]]).unwrap();
        let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
        let s = arena.alloc_state();
        arena.init_state(s, &inst);

        let mut order = vec![];
        let mut l = 0;
        while arena.is_retrievable(s) {
            order.push(arena.top(s, arena.target_stack(s)).p);
            arena.retrieve(s, l);
            l += 1;
        }
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(arena.n_blocks(s), 0);
    }

    #[test]
    fn body_aliasing_is_observed_across_handles() {
        let inst = small_instance();
        let mut arena = StateArena::new(inst.n_stacks, inst.n_tiers);
        let parent = arena.alloc_state();
        arena.init_state(parent, &inst);

        let mut child = arena.alloc_head_only();
        arena.copy_head(child, parent);
        arena.reuse_body(&mut child, parent);

        arena.move_out(child, 0, 5);
        // parent's body is the same buffer: the write is visible through it.
        assert_eq!(arena.slot(parent, 0, 2).p, arena.slot(child, 0, 2).p);
    }
}
