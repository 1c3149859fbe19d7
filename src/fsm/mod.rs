//! Function-pointer finite state machine for heater staging.
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │  StateTable                                    │
//! │  ┌──────────┬───────────┬───────────────────┐  │
//! │  │ StateId  │ on_enter  │ on_update         │  │
//! │  ├──────────┼───────────┼───────────────────┤  │
//! │  │ Disabled │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  │ Idle     │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  │ Stage1   │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  │ Stage2   │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  └──────────┴───────────┴───────────────────┘  │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! Each pass the engine calls `on_update` for the current state.  If it
//! returns `Some(next_id)` the engine moves the current pointer and runs
//! `on_enter` for the next state.  At most one transition happens per
//! pass.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Mode is Off; nothing is staged.
    Disabled = 0,
    /// Enabled without heating demand.
    Idle = 1,
    /// Fan and heater 1 on.
    Stage1 = 2,
    /// Fan and both heaters on.
    Stage2 = 3,
}

impl StateId {
    pub const COUNT: usize = 4;

    /// Convert a table index back to `StateId`.  Out-of-range indices fall
    /// back to `Disabled` (debug-asserted).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Disabled,
            1 => Self::Idle,
            2 => Self::Stage1,
            3 => Self::Stage2,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Disabled
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Runs once when a state is entered.
pub type StateActionFn = fn(&mut FsmContext);

/// Per-pass handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<StateId>;

/// One row of the state table.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`.  Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("staging FSM starting in {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Evaluate the current state once and take at most one transition.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        if let Some(next) = (self.table[self.current].on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// Jump straight to `next` (mode-off shutdown).  No-op when already there.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FsmContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "staging: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
