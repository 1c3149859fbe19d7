//! Relay output driver.
//!
//! The relay board is active-low: pulling the input low energises the
//! coil.  This driver is the only place that knows about polarity; the
//! rest of the firmware deals in logical on/off.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::error::ActuatorError;

pub struct RelayDriver<P: OutputPin> {
    pin: P,
    active_low: bool,
    on: bool,
    label: &'static str,
}

impl<P: OutputPin> RelayDriver<P> {
    /// Take the pin and drive it to logical off immediately.
    pub fn new(pin: P, active_low: bool, label: &'static str) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            active_low,
            on: false,
            label,
        };
        relay.drive(false)?;
        Ok(relay)
    }

    /// Switch the relay to logical `on`.  On a failed write the cached
    /// state is left as it was.
    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.drive(on)?;
        self.on = on;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    fn drive(&mut self, on: bool) -> Result<(), ActuatorError> {
        let high = on != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| {
            warn!("relay '{}': GPIO write failed", self.label);
            ActuatorError::GpioWriteFailed
        })
    }
}
