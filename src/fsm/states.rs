//! State handler functions and the static state table.
//!
//! Each state has an optional `on_enter` and a mandatory `on_update`.
//! Handlers never touch hardware: they write logical outputs into
//! [`FsmContext::commands`] and the service applies them afterwards.
//!
//! The fan is not a state.  It is switched on together with heater 1 and
//! switched off only by the purge countdown, outside this table.

use log::info;

use super::context::{FsmContext, HeatingState};
use super::{StateDescriptor, StateId};

/// Build the state table.  Order must match `StateId` discriminants.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Disabled,
            name: "DISABLED",
            on_enter: Some(disabled_enter),
            on_update: disabled_update,
        },
        StateDescriptor {
            id: StateId::Idle,
            name: "IDLE",
            on_enter: Some(idle_enter),
            on_update: idle_update,
        },
        StateDescriptor {
            id: StateId::Stage1,
            name: "STAGE1",
            on_enter: Some(stage1_enter),
            on_update: stage1_update,
        },
        StateDescriptor {
            id: StateId::Stage2,
            name: "STAGE2",
            on_enter: Some(stage2_enter),
            on_update: stage2_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════
//  DISABLED — mode Off; heaters forced off, fan purges out
// ═══════════════════════════════════════════════════════════════

fn disabled_enter(ctx: &mut FsmContext) {
    ctx.heaters_off();
    ctx.heating = HeatingState::Off;
}

/// Re-enabling forces nothing: the first enabled pass derives the state
/// from the current demand.
fn disabled_update(ctx: &mut FsmContext) -> Option<StateId> {
    if !ctx.enabled {
        return None;
    }
    if ctx.demand {
        Some(StateId::Stage1)
    } else {
        Some(StateId::Idle)
    }
}

// ═══════════════════════════════════════════════════════════════
//  IDLE — enabled, no demand
// ═══════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.heaters_off();
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.heat_wanted() {
        Some(StateId::Stage1)
    } else {
        None
    }
}

// ═══════════════════════════════════════════════════════════════
//  STAGE1 — fan + heater 1
// ═══════════════════════════════════════════════════════════════

fn stage1_enter(ctx: &mut FsmContext) {
    if !ctx.commands.fan {
        ctx.commands.fan = true;
        info!("fan on");
    }
    ctx.commands.heater1 = true;
    ctx.heating = HeatingState::Heat;
    ctx.stage2_origin_secs = ctx.now_secs;
    ctx.rearm_purge();
    info!("heater 1 on");
}

fn stage1_update(ctx: &mut FsmContext) -> Option<StateId> {
    if !ctx.heat_wanted() {
        return Some(StateId::Idle);
    }

    ctx.rearm_purge();

    if ctx.stage1_elapsed_secs() >= ctx.stage2_delay_secs as u64 {
        return Some(StateId::Stage2);
    }
    None
}

// ═══════════════════════════════════════════════════════════════
//  STAGE2 — fan + heater 1 + heater 2
// ═══════════════════════════════════════════════════════════════

fn stage2_enter(ctx: &mut FsmContext) {
    ctx.commands.heater2 = true;
    info!(
        "heater 2 on (stage 1 held {}s)",
        ctx.stage1_elapsed_secs()
    );
}

fn stage2_update(ctx: &mut FsmContext) -> Option<StateId> {
    if !ctx.heat_wanted() {
        return Some(StateId::Idle);
    }
    ctx.rearm_purge();
    None
}
