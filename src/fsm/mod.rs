//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, shared by both node roles:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  StateTable<S, C, N>                                     │
//! │  ┌──────────────┬───────────┬──────────┬──────────────┐  │
//! │  │ S            │ on_enter  │ on_exit  │ on_update    │  │
//! │  ├──────────────┼───────────┼──────────┼──────────────┤  │
//! │  │ Idle         │ fn(&mut C)│ fn(&mut C)│ fn -> Option │  │
//! │  │ ...          │           │          │              │  │
//! │  └──────────────┴───────────┴──────────┴──────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! state, then `on_enter` for the next, and updates the current pointer.
//! Handlers only touch their context `C`; the owning service turns the
//! context's commands into port calls.

pub mod control;
pub mod sense;

use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Implemented by each role's state enum. `index` must be dense in
/// `0..COUNT` and agree with the position in the state table.
pub trait StateId: Copy + Eq + core::fmt::Debug {
    const COUNT: usize;

    fn index(self) -> usize;

    fn from_index(idx: usize) -> Self;
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn<C> = fn(&mut C);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn<S, C> = fn(&mut C) -> Option<S>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor<S, C> {
    pub id: S,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<C>>,
    pub on_exit: Option<StateActionFn<C>>,
    pub on_update: StateUpdateFn<S, C>,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm<S: StateId, C, const N: usize> {
    /// Log prefix (node role).
    label: &'static str,
    /// Fixed-size table indexed by `S::index()`.
    table: [StateDescriptor<S, C>; N],
    current: usize,
}

impl<S: StateId, C, const N: usize> Fsm<S, C, N> {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(label: &'static str, table: [StateDescriptor<S, C>; N], initial: S) -> Self {
        debug_assert_eq!(N, S::COUNT, "state table size mismatch");
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id.index() == i),
            "state table out of order"
        );
        Self {
            label,
            table,
            current: initial.index(),
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut C) {
        info!(
            "{} FSM starting in state: {}",
            self.label, self.table[self.current].name
        );
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut C) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition regardless of what `on_update` would
    /// return (used for aborts).
    pub fn force_transition(&mut self, next: S, ctx: &mut C) {
        if next.index() != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> S {
        S::from_index(self.current)
    }

    fn transition(&mut self, next_id: S, ctx: &mut C) {
        let next_idx = next_id.index();

        info!(
            "{} FSM transition: {} -> {}",
            self.label, self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
