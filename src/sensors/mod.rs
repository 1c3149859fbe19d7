//! Climate sensing — the DHT22 driver and the [`SensorGate`].
//!
//! The gate reads the indoor probe (which feeds the controller) and the
//! outdoor probe (reporting only) on every sensor interval.  A failed read
//! leaves the previous measurement untouched: stale-but-valid data is
//! preferred over nothing.  Between samples the gate is a read-only cache.

pub mod dht22;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SensorPort};

/// Which probe a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Inside the heated space; its temperature is the controlled variable.
    Indoor,
    /// Outside; reported for display only.
    Outdoor,
}

/// One successful probe read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Last known good reading of a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// At least one read has ever succeeded.
    pub valid: bool,
    /// Uptime (s) of the read that produced the values.
    pub timestamp_secs: u64,
}

impl Measurement {
    /// "No reading yet" sentinel.
    pub const fn none() -> Self {
        Self {
            temperature_c: 0.0,
            humidity_pct: 0.0,
            valid: false,
            timestamp_secs: 0,
        }
    }

    fn update(&mut self, reading: ClimateReading, now_secs: u64) {
        self.temperature_c = reading.temperature_c;
        self.humidity_pct = reading.humidity_pct;
        self.valid = true;
        self.timestamp_secs = now_secs;
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::none()
    }
}

/// Per-probe bookkeeping inside the gate.
#[derive(Debug, Clone, Copy, Default)]
struct ProbeSlot {
    last: Measurement,
    consecutive_failures: u32,
}

/// What one `sample()` pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleOutcome {
    /// Fresh indoor reading to feed the controller, if the read succeeded.
    pub indoor: Option<ClimateReading>,
    pub outdoor: Option<ClimateReading>,
}

pub struct SensorGate {
    indoor: ProbeSlot,
    outdoor: ProbeSlot,
}

impl SensorGate {
    pub fn new() -> Self {
        Self {
            indoor: ProbeSlot::default(),
            outdoor: ProbeSlot::default(),
        }
    }

    /// Throw-away first read of both probes; a DHT22's first conversion
    /// after power-up is usually garbage.
    pub fn prime(&mut self, sensors: &mut impl SensorPort) {
        for probe in [Probe::Indoor, Probe::Outdoor] {
            if let Err(e) = sensors.read(probe) {
                info!("{:?} probe priming read failed ({}), expected after power-up", probe, e);
            }
        }
    }

    /// Read both probes once.  Successful reads replace the stored
    /// measurement and are published; failures are logged and published
    /// as faults.  No retries — the next interval tries again.
    pub fn sample(
        &mut self,
        sensors: &mut impl SensorPort,
        now_secs: u64,
        sink: &mut impl EventSink,
    ) -> SampleOutcome {
        info!("reading climate probes");
        SampleOutcome {
            indoor: Self::sample_probe(&mut self.indoor, Probe::Indoor, sensors, now_secs, sink),
            outdoor: Self::sample_probe(&mut self.outdoor, Probe::Outdoor, sensors, now_secs, sink),
        }
    }

    fn sample_probe(
        slot: &mut ProbeSlot,
        probe: Probe,
        sensors: &mut impl SensorPort,
        now_secs: u64,
        sink: &mut impl EventSink,
    ) -> Option<ClimateReading> {
        match sensors.read(probe) {
            Ok(reading) => {
                slot.last.update(reading, now_secs);
                slot.consecutive_failures = 0;
                sink.emit(&AppEvent::Climate { probe, reading });
                Some(reading)
            }
            Err(error) => {
                slot.consecutive_failures = slot.consecutive_failures.saturating_add(1);
                warn!(
                    "failed to read {:?} probe: {} ({} in a row)",
                    probe, error, slot.consecutive_failures
                );
                sink.emit(&AppEvent::SensorFault { probe, error });
                None
            }
        }
    }

    /// The indoor probe has produced at least one good reading.  Gates all
    /// control action.
    pub fn has_valid_primary(&self) -> bool {
        self.indoor.last.valid
    }

    pub fn measurement(&self, probe: Probe) -> Measurement {
        match probe {
            Probe::Indoor => self.indoor.last,
            Probe::Outdoor => self.outdoor.last,
        }
    }

    pub fn consecutive_failures(&self, probe: Probe) -> u32 {
        match probe {
            Probe::Indoor => self.indoor.consecutive_failures,
            Probe::Outdoor => self.outdoor.consecutive_failures,
        }
    }
}

impl Default for SensorGate {
    fn default() -> Self {
        Self::new()
    }
}
