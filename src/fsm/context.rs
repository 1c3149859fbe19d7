//! Shared mutable context threaded through every staging handler.
//!
//! `FsmContext` is the one struct the state handlers read from and write
//! to: the demand inputs for this pass, the logical actuator outputs, the
//! purge and stage-2 timing, and the staging delays from configuration.

use log::info;

use crate::config::ThermostatConfig;
use crate::timer::Countdown;

// ---------------------------------------------------------------------------
// Actuator outputs (written by state handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Logical on/off state of the three relays.  Electrical polarity is the
/// relay driver's business, not the control logic's.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub heater1: bool,
    pub heater2: bool,
    pub fan: bool,
}

impl ActuatorState {
    pub const fn all_off() -> Self {
        Self {
            heater1: false,
            heater2: false,
            fan: false,
        }
    }
}

/// What the thermostat accessory reports as its current activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatingState {
    Off,
    Heat,
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Inputs for the current pass --
    /// Monotonic uptime (s) of the current pass.
    pub now_secs: u64,
    /// Controller output is above the demand threshold.
    pub demand: bool,
    /// The control loop is enabled (mode `Auto`).
    pub enabled: bool,

    // -- Outputs --
    pub commands: ActuatorState,
    pub heating: HeatingState,

    // -- Timing --
    /// Fan run-on timer; refreshed while heat is demanded.
    pub purge: Countdown,
    /// Uptime (s) at which heater 1 last switched on.
    pub stage2_origin_secs: u64,
    pub purge_delay_secs: u32,
    pub stage2_delay_secs: u32,
}

impl FsmContext {
    pub fn new(config: &ThermostatConfig) -> Self {
        Self {
            now_secs: 0,
            demand: false,
            enabled: false,
            commands: ActuatorState::all_off(),
            heating: HeatingState::Off,
            purge: Countdown::new(),
            stage2_origin_secs: 0,
            purge_delay_secs: config.purge_delay_secs,
            stage2_delay_secs: config.stage2_delay_secs,
        }
    }

    /// Heat is demanded and the loop is allowed to act on it.
    pub fn heat_wanted(&self) -> bool {
        self.enabled && self.demand
    }

    /// Restart the fan run-on countdown from now.
    pub fn rearm_purge(&mut self) {
        self.purge.arm(self.now_secs, self.purge_delay_secs);
    }

    /// Seconds heater 1 has been on since its last off→on edge.
    pub fn stage1_elapsed_secs(&self) -> u64 {
        self.now_secs.saturating_sub(self.stage2_origin_secs)
    }

    /// Switch both heaters off, restarting the purge for each one that was
    /// on.  The fan is left to its own countdown.
    pub fn heaters_off(&mut self) {
        if self.commands.heater1 {
            self.commands.heater1 = false;
            self.heating = HeatingState::Off;
            self.rearm_purge();
            info!("heater 1 off");
        }
        if self.commands.heater2 {
            self.commands.heater2 = false;
            self.rearm_purge();
            info!("heater 2 off");
        }
    }
}
