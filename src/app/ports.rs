//! Port traits — the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Thermostat (domain)
//! ```
//!
//! Driven adapters (climate probes, relays, event sinks, clock) and the
//! remote command inbox implement these traits.  The [`Thermostat`](super::service::Thermostat) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorError};
use crate::sensors::{ClimateReading, Probe};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

pub trait SensorPort {
    /// One bounded, blocking read of a climate probe.
    fn read(&mut self, probe: Probe) -> Result<ClimateReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Relay channels driven by the staging logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Fan,
    Heater1,
    Heater2,
}

pub trait ActuatorPort {
    /// Drive a channel to logical on/off.  Polarity inversion belongs to
    /// the implementation.
    fn write(&mut self, channel: Channel, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget outlet for [`AppEvent`](super::events::AppEvent)s.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Command source (driving adapter: remote transport → domain)
// ───────────────────────────────────────────────────────────────

/// Already-dequeued remote commands, handed to the tick loop one at a time.
pub trait CommandSource {
    /// Next pending command, or `None` when the inbox is empty.
    fn next_command(&mut self) -> Option<super::commands::AppCommand>;
}

// ───────────────────────────────────────────────────────────────
// Feedback controller (external collaborator)
// ───────────────────────────────────────────────────────────────

/// Contract of the continuous controller the staging logic consumes.
///
/// `compute` is called every pass, enabled or not; the implementation
/// decides whether its sample period has elapsed and whether it is in
/// automatic mode.  It returns the (possibly unchanged) bounded output.
pub trait FeedbackController {
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn set_setpoint(&mut self, setpoint: f32);
    fn setpoint(&self) -> f32;
    /// Latest process value.
    fn set_input(&mut self, input: f32);
    fn compute(&mut self, now_secs: u64) -> f32;
    fn output(&self) -> f32;
    fn set_output_limits(&mut self, min: f32, max: f32);
    fn set_sample_time(&mut self, secs: u32);
}

// ───────────────────────────────────────────────────────────────
// Time source
// ───────────────────────────────────────────────────────────────

/// Monotonic uptime in whole seconds.  Never runs backwards.
pub trait Clock {
    fn uptime_secs(&self) -> u64;
}
