//! Integration tests for the Thermostat → staging → relays pipeline.
//!
//! Every test drives the service one simulated second per tick with a
//! scripted controller output.  The default configuration is used
//! throughout: probes every 60 s, purge 180 s, stage 2 after 1800 s.

use heatstage::adapters::remote::{deliver_to, CommandChannel, RemoteInbox};
use heatstage::app::commands::{AppCommand, Characteristic, ControlMode, RemoteValue};
use heatstage::app::events::AppEvent;
use heatstage::app::ports::Channel;
use heatstage::app::service::Thermostat;
use heatstage::config::ThermostatConfig;
use heatstage::fsm::StateId;
use heatstage::fsm::context::{ActuatorState, HeatingState};
use heatstage::sensors::Probe;

use crate::mock_hw::{MockHardware, QueueInbox, RecordingSink, Rig};

const PURGE: u64 = 180;
const STAGE2: u64 = 1800;
/// First tick at which the indoor probe has produced a reading.
const FIRST_SAMPLE: u64 = 60;

/// Started rig whose indoor probe reads once at t=60.
fn warmed() -> Rig {
    let mut rig = Rig::start(MockHardware::with_indoor(5.0));
    rig.run(1, FIRST_SAMPLE);
    assert!(rig.thermostat.has_valid_measurement());
    rig
}

const ALL_ON: ActuatorState = ActuatorState {
    heater1: true,
    heater2: true,
    fan: true,
};

// ── Startup ───────────────────────────────────────────────────

#[test]
fn startup_publishes_all_off_status_once() {
    let rig = Rig::start(MockHardware::with_indoor(5.0));
    assert_eq!(
        rig.sink.statuses(),
        vec!["Heater 1: OFF, Heater 2: OFF, Fan: OFF".to_owned()]
    );
    assert!(rig.sink.events.contains(&AppEvent::Started(ControlMode::Auto)));
    assert!(rig.script.borrow().enabled, "boot mode Auto enables the controller");
    assert_eq!(rig.script.borrow().limits, Some((0.0, 30.0)));
    assert_eq!(rig.script.borrow().sample_secs, Some(60));
    assert_eq!(rig.thermostat.setpoint(), 9.0);
}

#[test]
fn startup_primes_probes_without_trusting_them() {
    let rig = Rig::start(MockHardware::with_indoor(5.0));
    assert_eq!(rig.hw.reads, 2);
    assert!(!rig.thermostat.has_valid_measurement());
    assert!(rig.hw.writes.iter().all(|(_, on)| !on));
}

// ── Scenario A: never a valid measurement ─────────────────────

#[test]
fn no_valid_measurement_means_no_actuation() {
    let mut rig = Rig::start(MockHardware::new());
    rig.set_output(30.0);
    rig.run(1, 1000);

    assert_eq!(rig.thermostat.actuators(), ActuatorState::all_off());
    assert_eq!(rig.hw.levels, ActuatorState::all_off());
    assert_eq!(rig.hw.on_writes(), 0);
    assert_eq!(rig.script.borrow().computes, 0, "guard sits before compute");
    assert_eq!(rig.thermostat.state(), StateId::Disabled);
    assert_eq!(rig.sink.statuses().len(), 1);
}

// ── Scenario B: demand, stage 1, then stage 2 on time ─────────

#[test]
fn demand_runs_stage1_then_stage2_after_delay() {
    let mut rig = warmed();
    let t0 = FIRST_SAMPLE + 1;
    rig.set_output(30.0);
    rig.tick(t0);

    assert_eq!(rig.thermostat.state(), StateId::Stage1);
    assert!(rig.hw.levels.heater1 && rig.hw.levels.fan);
    assert!(!rig.hw.levels.heater2);

    rig.run(t0 + 1, t0 + STAGE2 - 1);
    assert!(!rig.hw.levels.heater2, "heater 2 before the delay");

    rig.tick(t0 + STAGE2);
    assert_eq!(rig.thermostat.state(), StateId::Stage2);
    assert_eq!(rig.hw.levels, ALL_ON);
    assert_eq!(
        rig.sink.statuses().last().map(String::as_str),
        Some("Heater 1: ON, Heater 2: ON, Fan: ON")
    );
}

// ── Scenario C: demand drop, fan purges out ───────────────────

#[test]
fn demand_drop_kills_heaters_and_purges_fan() {
    let mut rig = warmed();
    let t0 = FIRST_SAMPLE + 1;
    rig.set_output(30.0);
    rig.run(t0, t0 + STAGE2 + 20);
    assert_eq!(rig.hw.levels, ALL_ON);

    let t = t0 + STAGE2 + 21;
    rig.set_output(0.0);
    rig.tick(t);
    assert!(!rig.hw.levels.heater1 && !rig.hw.levels.heater2);
    assert!(rig.hw.levels.fan);
    assert_eq!(rig.thermostat.state(), StateId::Idle);

    rig.run(t + 1, t + PURGE - 1);
    assert!(rig.hw.levels.fan, "fan off before the purge delay");

    rig.tick(t + PURGE);
    assert!(!rig.hw.levels.fan);

    rig.run(t + PURGE + 1, t + PURGE + 600);
    let fan_offs = rig
        .hw
        .writes
        .iter()
        .filter(|w| **w == (Channel::Fan, false))
        .count();
    assert_eq!(fan_offs, 2, "initial off plus exactly one purge-out");
}

// ── Scenario D: mode off while heating ────────────────────────

#[test]
fn mode_off_while_heating_purges_and_stays_off() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.run(FIRST_SAMPLE + 1, 100);
    assert!(rig.hw.levels.heater1);

    rig.command(AppCommand::SetMode(ControlMode::Off));
    rig.tick(101);
    assert!(!rig.hw.levels.heater1);
    assert!(rig.hw.levels.fan);
    assert!(!rig.thermostat.controller_enabled());
    assert_eq!(rig.thermostat.state(), StateId::Disabled);
    assert_eq!(rig.thermostat.heating_state(), HeatingState::Off);

    rig.run(102, 101 + PURGE - 1);
    assert!(rig.hw.levels.fan);
    rig.tick(101 + PURGE);
    assert!(!rig.hw.levels.fan);

    rig.run(101 + PURGE + 1, 900);
    assert_eq!(rig.hw.levels, ActuatorState::all_off(), "output alone must not re-arm");

    rig.command(AppCommand::SetMode(ControlMode::Auto));
    rig.tick(901);
    assert!(rig.thermostat.controller_enabled());
    rig.tick(902);
    assert_eq!(rig.thermostat.state(), StateId::Stage1);
    assert!(rig.hw.levels.heater1 && rig.hw.levels.fan);
}

// ── Scenario E: back-to-back setpoints ────────────────────────

#[test]
fn setpoint_changes_alone_do_not_actuate() {
    let mut rig = warmed();
    rig.tick(FIRST_SAMPLE + 1);
    let statuses = rig.sink.statuses().len();

    rig.command(AppCommand::SetSetpoint(9.0));
    rig.command(AppCommand::SetSetpoint(12.0));
    rig.tick(FIRST_SAMPLE + 2);

    assert_eq!(rig.thermostat.setpoint(), 12.0);
    assert_eq!(rig.script.borrow().setpoint, 12.0);
    assert_eq!(rig.hw.on_writes(), 0);
    assert_eq!(rig.sink.statuses().len(), statuses);
}

#[test]
fn out_of_range_setpoint_is_clamped() {
    let mut rig = warmed();
    rig.command(AppCommand::SetSetpoint(40.0));
    rig.tick(FIRST_SAMPLE + 1);
    assert_eq!(rig.thermostat.setpoint(), 25.0);
}

// ── Oscillation near the threshold ────────────────────────────

#[test]
fn oscillating_demand_keeps_fan_running() {
    let mut rig = warmed();
    let start = FIRST_SAMPLE + 1;
    for now in start..start + 3600 {
        // 60 s above threshold, 60 s at/below it.
        let above = ((now - start) / 60) % 2 == 0;
        rig.set_output(if above { 30.0 } else { 1.0 });
        rig.tick(now);
        assert!(rig.hw.levels.fan, "fan dropped at t={now}");
        assert!(!rig.hw.levels.heater2, "stage 2 reached at t={now}");
    }
}

// ── Idempotence ───────────────────────────────────────────────

#[test]
fn repeated_auto_changes_nothing() {
    let mut rig = warmed();
    rig.tick(FIRST_SAMPLE + 1);
    rig.sink.clear();
    let writes = rig.hw.writes.len();

    rig.command(AppCommand::SetMode(ControlMode::Auto));
    rig.tick(FIRST_SAMPLE + 2);

    assert_eq!(rig.sink.events, vec![AppEvent::ModeAccepted(ControlMode::Auto)]);
    assert_eq!(rig.hw.writes.len(), writes);
    assert_eq!(rig.thermostat.state(), StateId::Idle);
}

#[test]
fn repeated_off_is_safe_and_republishes() {
    let mut rig = warmed();
    rig.command(AppCommand::SetMode(ControlMode::Off));
    rig.tick(FIRST_SAMPLE + 1);
    let writes = rig.hw.writes.len();
    let statuses = rig.sink.statuses().len();

    rig.command(AppCommand::SetMode(ControlMode::Off));
    rig.tick(FIRST_SAMPLE + 2);

    assert_eq!(rig.hw.writes.len(), writes);
    assert_eq!(rig.hw.levels, ActuatorState::all_off());
    assert_eq!(rig.sink.statuses().len(), statuses + 1);
    assert_eq!(rig.thermostat.mode(), ControlMode::Off);
}

#[test]
fn heat_and_cool_are_acknowledged_but_inert() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);
    let levels = rig.hw.levels;

    rig.command(AppCommand::SetMode(ControlMode::Heat));
    rig.command(AppCommand::SetMode(ControlMode::Cool));
    rig.tick(FIRST_SAMPLE + 2);

    assert_eq!(rig.hw.levels, levels);
    assert_eq!(rig.thermostat.mode(), ControlMode::Auto);
    assert!(rig.sink.events.contains(&AppEvent::ModeAccepted(ControlMode::Cool)));
}

#[test]
fn direct_command_applies_without_a_tick() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);
    assert!(rig.hw.levels.heater1);
    let statuses = rig.sink.statuses().len();

    rig.thermostat.handle_command(
        AppCommand::SetMode(ControlMode::Off),
        FIRST_SAMPLE + 1,
        &mut rig.hw,
        &mut rig.sink,
    );

    assert!(!rig.hw.levels.heater1);
    assert!(rig.hw.levels.fan, "fan left to purge");
    assert!(!rig.thermostat.controller_enabled());
    assert_eq!(rig.sink.statuses().len(), statuses + 1);
    assert!(rig.sink.events.contains(&AppEvent::ModeAccepted(ControlMode::Off)));
    assert_eq!(
        rig.sink.statuses().last().map(String::as_str),
        Some("Heater 1: OFF, Heater 2: OFF, Fan: ON")
    );
}

// ── Remote characteristic path ────────────────────────────────

#[test]
fn remote_writes_reach_the_loop() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);

    let channel = CommandChannel::new();
    deliver_to(
        &channel,
        Characteristic::TargetHeatingCoolingState,
        RemoteValue::UInt8(9),
    );
    deliver_to(&channel, Characteristic::TargetTemperature, RemoteValue::Float(14.5));
    rig.thermostat.tick(
        FIRST_SAMPLE + 2,
        &mut rig.hw,
        &mut RemoteInbox::on(&channel),
        &mut rig.sink,
    );
    assert_eq!(rig.thermostat.setpoint(), 14.5);
    assert!(rig.hw.levels.heater1, "unknown mode value is inert");

    deliver_to(
        &channel,
        Characteristic::TargetHeatingCoolingState,
        RemoteValue::UInt8(ControlMode::Off.as_raw()),
    );
    rig.thermostat.tick(
        FIRST_SAMPLE + 3,
        &mut rig.hw,
        &mut RemoteInbox::on(&channel),
        &mut rig.sink,
    );
    assert!(!rig.hw.levels.heater1);
    assert_eq!(rig.thermostat.mode(), ControlMode::Off);
}

// ── Sensor and relay faults ───────────────────────────────────

#[test]
fn stale_measurement_keeps_loop_running() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);
    rig.hw.indoor = None;
    rig.run(FIRST_SAMPLE + 2, 300);

    assert_eq!(rig.thermostat.state(), StateId::Stage1);
    let m = rig.thermostat.measurement(Probe::Indoor);
    assert!(m.valid);
    assert_eq!(m.timestamp_secs, FIRST_SAMPLE);
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SensorFault {
            probe: Probe::Indoor,
            ..
        }
    )));
    assert_eq!(rig.script.borrow().input, Some(5.0));
}

#[test]
fn failed_relay_write_is_retried() {
    let mut rig = warmed();
    rig.hw.fail_writes = true;
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);
    assert!(rig.thermostat.actuators().heater1);
    assert!(!rig.hw.levels.heater1);

    rig.hw.fail_writes = false;
    rig.tick(FIRST_SAMPLE + 2);
    assert!(rig.hw.levels.heater1 && rig.hw.levels.fan);
}

#[test]
fn heating_state_follows_heater1() {
    let mut rig = warmed();
    rig.set_output(30.0);
    rig.tick(FIRST_SAMPLE + 1);
    rig.set_output(0.0);
    rig.tick(FIRST_SAMPLE + 2);

    let reported: Vec<HeatingState> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::HeatingState(h) => Some(*h),
            _ => None,
        })
        .collect();
    assert_eq!(reported, vec![HeatingState::Heat, HeatingState::Off]);
}

// ── Real controller ───────────────────────────────────────────

#[test]
fn pid_heats_cold_room_and_stops_when_warm() {
    let mut thermostat = Thermostat::new(ThermostatConfig::default());
    let mut hw = MockHardware::with_indoor(2.0);
    let mut sink = RecordingSink::new();
    let mut inbox = QueueInbox::default();
    thermostat.start(0, &mut hw, &mut sink);

    for now in 1..=FIRST_SAMPLE + 1 {
        thermostat.tick(now, &mut hw, &mut inbox, &mut sink);
    }
    assert!(hw.levels.heater1 && hw.levels.fan);

    hw.indoor = hw.indoor.map(|mut r| {
        r.temperature_c = 20.0;
        r
    });
    for now in FIRST_SAMPLE + 2..=2 * FIRST_SAMPLE + 1 {
        thermostat.tick(now, &mut hw, &mut inbox, &mut sink);
    }
    assert!(!hw.levels.heater1);
    assert!(hw.levels.fan, "fan purges after heating stops");
    assert_eq!(thermostat.state(), StateId::Idle);

    let telem = thermostat.build_telemetry();
    assert_eq!(telem.indoor.temperature_c, 20.0);
    assert_eq!(telem.controller_output, 0.0);
}
