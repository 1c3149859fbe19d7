//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns both DHT22 probes and the three relay drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only module
//! in the system that touches actual hardware.  Pin and delay types are
//! generic so the same adapter runs on `esp-idf-hal` drivers on target and
//! on simulated pins on the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ActuatorPort, Channel, SensorPort};
use crate::drivers::relay::RelayDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::dht22::Dht22;
use crate::sensors::{ClimateReading, Probe};

/// The three relay outputs, one per [`Channel`].
pub struct Relays<R: OutputPin> {
    pub fan: RelayDriver<R>,
    pub heater1: RelayDriver<R>,
    pub heater2: RelayDriver<R>,
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, D, R: OutputPin> {
    indoor: Dht22<P, D>,
    outdoor: Dht22<P, D>,
    relays: Relays<R>,
}

impl<P, D, R> HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    pub fn new(indoor: Dht22<P, D>, outdoor: Dht22<P, D>, relays: Relays<R>) -> Self {
        Self {
            indoor,
            outdoor,
            relays,
        }
    }

    /// Logical relay state as last written.
    pub fn relay_on(&self, channel: Channel) -> bool {
        self.relay(channel).is_on()
    }

    fn relay(&self, channel: Channel) -> &RelayDriver<R> {
        match channel {
            Channel::Fan => &self.relays.fan,
            Channel::Heater1 => &self.relays.heater1,
            Channel::Heater2 => &self.relays.heater2,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, D, R> SensorPort for HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    fn read(&mut self, probe: Probe) -> Result<ClimateReading, SensorError> {
        let dht = match probe {
            Probe::Indoor => &mut self.indoor,
            Probe::Outdoor => &mut self.outdoor,
        };
        read_uninterrupted(dht)
    }
}

/// The bit timing does not survive an interrupt landing mid-frame, so on
/// target the transaction runs with interrupts masked.
#[cfg(target_os = "espidf")]
fn read_uninterrupted<P, D>(dht: &mut Dht22<P, D>) -> Result<ClimateReading, SensorError>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    esp_idf_hal::interrupt::free(|| dht.read())
}

#[cfg(not(target_os = "espidf"))]
fn read_uninterrupted<P, D>(dht: &mut Dht22<P, D>) -> Result<ClimateReading, SensorError>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    dht.read()
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, D, R> ActuatorPort for HardwareAdapter<P, D, R>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    R: OutputPin,
{
    fn write(&mut self, channel: Channel, on: bool) -> Result<(), ActuatorError> {
        let relay = match channel {
            Channel::Fan => &mut self.relays.fan,
            Channel::Heater1 => &mut self.relays.heater1,
            Channel::Heater2 => &mut self.relays.heater2,
        };
        relay.set(on)
    }
}
