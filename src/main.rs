//! HeatStage Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   RemoteInbox    Esp32Time     │
//! │  (Sensor+Actuator) (EventSink)    (CommandSrc)   (Clock)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Thermostat (pure logic)                   │    │
//! │  │  SensorGate · PID · Staging FSM · Mode · Status        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, InputOutput, Output, PinDriver, Pull};
use log::info;

use heatstage::adapters::hardware::{HardwareAdapter, Relays};
use heatstage::adapters::log_sink::LogEventSink;
use heatstage::adapters::remote::RemoteInbox;
use heatstage::adapters::time::Esp32TimeAdapter;
use heatstage::app::events::AppEvent;
use heatstage::app::ports::{Clock, EventSink};
use heatstage::app::service::Thermostat;
use heatstage::config::ThermostatConfig;
use heatstage::drivers::relay::RelayDriver;
use heatstage::pins;
use heatstage::sensors::dht22::Dht22;
use heatstage::timer::Countdown;

type RelayPin = PinDriver<'static, AnyOutputPin, Output>;
type ProbePin = PinDriver<'static, AnyIOPin, InputOutput>;

fn relay(gpio: i32, label: &'static str) -> Result<RelayDriver<RelayPin>> {
    // SAFETY: every GPIO number in `pins` is claimed exactly once, here or
    // in `probe`, and nothing else in the firmware touches it.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(RelayDriver::new(PinDriver::output(pin)?, pins::RELAY_ACTIVE_LOW, label)?)
}

fn probe(gpio: i32) -> Result<Dht22<ProbePin, Ets>> {
    // SAFETY: see `relay`.
    let pin = unsafe { AnyIOPin::new(gpio) };
    let mut line = PinDriver::input_output_od(pin)?;
    line.set_pull(Pull::Up)?;
    Ok(Dht22::new(line, Ets)?)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  HeatStage v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ThermostatConfig::default();
    config.validate()?;

    // ── 3. Relays first, so the heaters are off before anything else ──
    let relays = Relays {
        fan: relay(pins::FAN_GPIO, "fan")?,
        heater1: relay(pins::HEATER1_GPIO, "heater1")?,
        heater2: relay(pins::HEATER2_GPIO, "heater2")?,
    };
    info!(
        "relays: fan=GPIO{} heater1=GPIO{} heater2=GPIO{} (active-low={})",
        pins::FAN_GPIO,
        pins::HEATER1_GPIO,
        pins::HEATER2_GPIO,
        pins::RELAY_ACTIVE_LOW
    );

    // ── 4. Probes ─────────────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        probe(pins::DHT_INDOOR_GPIO)?,
        probe(pins::DHT_OUTDOOR_GPIO)?,
        relays,
    );

    // ── 5. Service ────────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();
    let mut inbox = RemoteInbox::new();
    let mut thermostat = Thermostat::new(config.clone());
    thermostat.start(clock.uptime_secs(), &mut hw, &mut log_sink);

    let mut telemetry = Countdown::new();
    telemetry.arm(clock.uptime_secs(), config.telemetry_interval_secs);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let now = clock.uptime_secs();
        thermostat.tick(now, &mut hw, &mut inbox, &mut log_sink);

        if telemetry.expired(now) {
            log_sink.emit(&AppEvent::Telemetry(thermostat.build_telemetry()));
            telemetry.arm(now, config.telemetry_interval_secs);
        }

        FreeRtos::delay_ms(config.tick_interval_ms);
    }
}
