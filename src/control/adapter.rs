//! Calling contract around the continuous feedback controller.
//!
//! The controller itself is a black box behind [`FeedbackController`].
//! The adapter owns it and fixes how the control loop talks to it: only
//! valid measurements are fed, `compute` runs every pass whether or not the
//! loop is enabled, and setpoints are kept inside the accessory's range.

use log::{info, warn};

use crate::app::ports::FeedbackController;
use crate::config::ThermostatConfig;
use crate::sensors::Measurement;

pub struct ControllerAdapter<C: FeedbackController> {
    controller: C,
    min_setpoint_c: f32,
    max_setpoint_c: f32,
}

impl<C: FeedbackController> ControllerAdapter<C> {
    /// Take ownership of `controller` and apply output limits, sample time
    /// and the boot setpoint.  The controller starts disabled.
    pub fn new(mut controller: C, config: &ThermostatConfig) -> Self {
        controller.set_output_limits(config.output_min, config.output_max);
        controller.set_sample_time(config.controller_sample_secs);
        controller.set_enabled(false);
        let mut adapter = Self {
            controller,
            min_setpoint_c: config.min_setpoint_c,
            max_setpoint_c: config.max_setpoint_c,
        };
        adapter.set_setpoint(config.default_setpoint_c);
        adapter
    }

    /// Switch the controller between automatic and manual.  Returns `true`
    /// if the mode actually changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.controller.is_enabled() == enabled {
            return false;
        }
        self.controller.set_enabled(enabled);
        info!("controller {}", if enabled { "enabled" } else { "disabled" });
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.controller.is_enabled()
    }

    /// Apply a new setpoint, clamped to the accessory range.  Non-finite
    /// values are dropped.  Returns the setpoint now in effect.
    pub fn set_setpoint(&mut self, setpoint_c: f32) -> f32 {
        if !setpoint_c.is_finite() {
            warn!("ignoring non-finite setpoint {}", setpoint_c);
            return self.controller.setpoint();
        }
        let clamped = setpoint_c.clamp(self.min_setpoint_c, self.max_setpoint_c);
        if clamped != setpoint_c {
            warn!(
                "setpoint {:.1} outside [{:.1}, {:.1}], using {:.1}",
                setpoint_c, self.min_setpoint_c, self.max_setpoint_c, clamped
            );
        }
        self.controller.set_setpoint(clamped);
        info!("setpoint {:.1}\u{00b0}C", clamped);
        clamped
    }

    pub fn setpoint(&self) -> f32 {
        self.controller.setpoint()
    }

    /// Hand a measurement to the controller.  Invalid measurements never
    /// reach it; the controller keeps working on the last valid input.
    pub fn feed(&mut self, measurement: &Measurement) {
        if measurement.valid {
            self.controller.set_input(measurement.temperature_c);
        }
    }

    /// Run the controller for this pass and return its bounded output.
    pub fn compute(&mut self, now_secs: u64) -> f32 {
        self.controller.compute(now_secs)
    }

    pub fn output(&self) -> f32 {
        self.controller.output()
    }

    pub fn inner(&self) -> &C {
        &self.controller
    }
}
