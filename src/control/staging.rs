//! Staged heater actuation.
//!
//! [`StagedActuator`] turns the continuous controller output into discrete
//! relay commands.  The heater stages live in the table-driven FSM; the fan
//! is handled here, after the table, because fan-off trails heater-off by
//! the purge delay and is decided only by the purge countdown.

use log::info;

use crate::config::ThermostatConfig;
use crate::fsm::context::{ActuatorState, FsmContext, HeatingState};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

pub struct StagedActuator {
    fsm: Fsm,
    ctx: FsmContext,
    /// Controller output strictly above this means heat is demanded.
    threshold: f32,
}

impl StagedActuator {
    /// Build the staging machine in `Disabled` with every output off.
    /// Call [`start`](Self::start) before the first [`step`](Self::step).
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Disabled),
            ctx: FsmContext::new(config),
            threshold: config.demand_threshold,
        }
    }

    pub fn start(&mut self, now_secs: u64) {
        self.ctx.now_secs = now_secs;
        self.fsm.start(&mut self.ctx);
    }

    /// One evaluation pass.  `enabled` is the controller's automatic flag.
    /// Returns `true` if any actuator command changed.
    ///
    /// Must only be called once a valid primary measurement exists.
    pub fn step(&mut self, now_secs: u64, output: f32, enabled: bool) -> bool {
        let before = self.ctx.commands;

        self.ctx.now_secs = now_secs;
        self.ctx.demand = output > self.threshold;
        self.ctx.enabled = enabled;
        self.fsm.tick(&mut self.ctx);

        if self.ctx.commands.fan && self.ctx.purge.expired(now_secs) {
            self.ctx.commands.fan = false;
            info!("fan off");
        }

        self.ctx.commands != before
    }

    /// Mode-off: drop both heaters and leave the fan to purge.  Safe to
    /// call repeatedly.  Returns `true` if any actuator command changed.
    pub fn shutdown(&mut self, now_secs: u64) -> bool {
        let before = self.ctx.commands;
        self.ctx.now_secs = now_secs;
        self.ctx.enabled = false;
        self.ctx.demand = false;
        self.fsm.force_transition(StateId::Disabled, &mut self.ctx);
        self.ctx.commands != before
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn actuators(&self) -> ActuatorState {
        self.ctx.commands
    }

    pub fn heating_state(&self) -> HeatingState {
        self.ctx.heating
    }

    /// Seconds until the fan purge runs out (0 once expired).
    pub fn purge_remaining_secs(&self, now_secs: u64) -> u64 {
        self.ctx.purge.remaining(now_secs)
    }
}
