//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART in production).  An accessory bridge would
//! implement the same trait and push the same events to its
//! characteristics.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::context::HeatingState;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | up={}s state={:?} mode={:?} | set={:.1}\u{00b0}C out={:.1} | \
                     in={:.1}\u{00b0}C/{:.0}% ({}) out={:.1}\u{00b0}C/{:.0}% ({}) | \
                     h1={} h2={} fan={}",
                    t.uptime_secs,
                    t.state,
                    t.mode,
                    t.setpoint_c,
                    t.controller_output,
                    t.indoor.temperature_c,
                    t.indoor.humidity_pct,
                    if t.indoor.valid { "ok" } else { "none" },
                    t.outdoor.temperature_c,
                    t.outdoor.humidity_pct,
                    if t.outdoor.valid { "ok" } else { "none" },
                    u8::from(t.actuators.heater1),
                    u8::from(t.actuators.heater2),
                    u8::from(t.actuators.fan),
                );
            }
            AppEvent::Status(text) => {
                info!("STATUS | {}", text);
            }
            AppEvent::HeatingState(state) => {
                let label = match state {
                    HeatingState::Off => "off",
                    HeatingState::Heat => "heat",
                };
                info!("HEATING | {}", label);
            }
            AppEvent::Climate { probe, reading } => {
                info!(
                    "CLIMATE | {:?} T={:.1}\u{00b0}C RH={:.1}%",
                    probe, reading.temperature_c, reading.humidity_pct
                );
            }
            AppEvent::SensorFault { probe, error } => {
                warn!("SENSOR | {:?} read failed: {}", probe, error);
            }
            AppEvent::ModeAccepted(mode) => {
                info!("MODE | {:?} (raw {})", mode, mode.as_raw());
            }
            AppEvent::Started(mode) => {
                info!("START | mode={:?}", mode);
            }
        }
    }
}
