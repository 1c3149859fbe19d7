//! Outbound application events.
//!
//! The [`Thermostat`](super::service::Thermostat) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, update accessory
//! characteristics, etc.

use heapless::String;

use crate::app::commands::ControlMode;
use crate::error::SensorError;
use crate::fsm::StateId;
use crate::fsm::context::{ActuatorState, HeatingState};
use crate::sensors::{ClimateReading, Measurement, Probe};

/// Capacity of a formatted status line.
pub const STATUS_CAPACITY: usize = 64;

/// Human-readable relay summary, e.g. `Heater 1: ON, Heater 2: OFF, Fan: ON`.
pub type StatusText = String<STATUS_CAPACITY>;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the boot mode).
    Started(ControlMode),

    /// Relay summary after a state-affecting change.
    Status(StatusText),

    /// Current heating activity as reported to the accessory.
    HeatingState(HeatingState),

    /// A probe produced a fresh reading.
    Climate { probe: Probe, reading: ClimateReading },

    /// A probe read failed; the previous measurement is retained.
    SensorFault { probe: Probe, error: SensorError },

    /// A mode command was accepted.
    ModeAccepted(ControlMode),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub uptime_secs: u64,
    pub state: StateId,
    pub mode: ControlMode,
    pub setpoint_c: f32,
    pub controller_output: f32,
    pub indoor: Measurement,
    pub outdoor: Measurement,
    pub actuators: ActuatorState,
    pub heating: HeatingState,
}
