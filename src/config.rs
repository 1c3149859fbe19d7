//! System configuration parameters
//!
//! All tunable parameters for the HeatStage thermostat.  Nothing here is
//! persisted: mode, setpoint and timers come back to these defaults on
//! every boot.  A JSON override document can be applied at build/flash
//! time through [`ThermostatConfig::from_json`].

use serde::{Deserialize, Serialize};

use crate::app::commands::ControlMode;
use crate::error::{Error, Result};

/// Core thermostat configuration.  Fields missing from an override
/// document keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    // --- Staging ---
    /// Controller output above which heating is demanded.
    pub demand_threshold: f32,
    /// Fan run-on after heating demand stops (seconds)
    pub purge_delay_secs: u32,
    /// Sustained stage-1 demand before heater 2 joins (seconds)
    pub stage2_delay_secs: u32,

    // --- Feedback controller ---
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    /// Lower clamp of the controller output.
    pub output_min: f32,
    /// Upper clamp of the controller output.
    pub output_max: f32,
    /// Controller sample period (seconds)
    pub controller_sample_secs: u32,

    // --- Setpoint ---
    /// Setpoint applied at boot (°C)
    pub default_setpoint_c: f32,
    /// Lowest setpoint the thermostat accessory accepts (°C)
    pub min_setpoint_c: f32,
    /// Highest setpoint the thermostat accessory accepts (°C)
    pub max_setpoint_c: f32,
    /// Mode applied at boot.
    pub boot_mode: ControlMode,

    // --- Timing ---
    /// Climate probe read interval (seconds)
    pub sensor_interval_secs: u32,
    /// Control loop pass interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            // Staging
            demand_threshold: 1.0,
            purge_delay_secs: 3 * 60,
            stage2_delay_secs: 30 * 60,

            // Feedback controller
            kp: 2.0,
            ki: 5.0,
            kd: 1.0,
            output_min: 0.0,
            output_max: 30.0,
            controller_sample_secs: 60,

            // Setpoint
            default_setpoint_c: 9.0,
            min_setpoint_c: 5.0,
            max_setpoint_c: 25.0,
            boot_mode: ControlMode::Auto,

            // Timing
            sensor_interval_secs: 60,
            tick_interval_ms: 100,
            telemetry_interval_secs: 300,
        }
    }
}

impl ThermostatConfig {
    /// Parse a JSON override document and validate it.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|_| Error::Config("malformed JSON document"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the control loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.purge_delay_secs == 0 {
            return Err(Error::Config("purge_delay_secs must be non-zero"));
        }
        if self.stage2_delay_secs == 0 {
            return Err(Error::Config("stage2_delay_secs must be non-zero"));
        }
        if self.output_min >= self.output_max {
            return Err(Error::Config("output_min must be below output_max"));
        }
        if !(self.output_min..self.output_max).contains(&self.demand_threshold) {
            return Err(Error::Config("demand_threshold must lie inside the output range"));
        }
        if self.controller_sample_secs == 0 {
            return Err(Error::Config("controller_sample_secs must be non-zero"));
        }
        if self.min_setpoint_c > self.max_setpoint_c {
            return Err(Error::Config("min_setpoint_c must not exceed max_setpoint_c"));
        }
        if !(self.min_setpoint_c..=self.max_setpoint_c).contains(&self.default_setpoint_c) {
            return Err(Error::Config("default_setpoint_c outside the setpoint range"));
        }
        if self.sensor_interval_secs == 0 || self.tick_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        Ok(())
    }
}
