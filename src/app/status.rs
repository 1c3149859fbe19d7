//! Relay status line.

use core::fmt::Write;

use log::warn;

use super::events::{AppEvent, StatusText};
use super::ports::EventSink;
use crate::fsm::context::ActuatorState;

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

/// Render `Heater 1: ON, Heater 2: OFF, Fan: ON`.
pub fn format_status(state: &ActuatorState) -> StatusText {
    let mut text = StatusText::new();
    if write!(
        text,
        "Heater 1: {}, Heater 2: {}, Fan: {}",
        on_off(state.heater1),
        on_off(state.heater2),
        on_off(state.fan)
    )
    .is_err()
    {
        warn!("status line truncated");
    }
    text
}

/// Publishes the relay summary through the event sink.
#[derive(Debug, Default)]
pub struct StatusPublisher {
    published: u32,
}

impl StatusPublisher {
    pub fn new() -> Self {
        Self { published: 0 }
    }

    pub fn publish(&mut self, state: &ActuatorState, sink: &mut impl EventSink) {
        self.published = self.published.wrapping_add(1);
        sink.emit(&AppEvent::Status(format_status(state)));
    }

    /// Number of status lines published since boot.
    pub fn published(&self) -> u32 {
        self.published
    }
}
