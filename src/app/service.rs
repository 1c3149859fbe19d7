//! Application service — the hexagonal core.
//!
//! [`Thermostat`] is the one owned control-loop context: sensor gate,
//! controller adapter, staging machine, mode controller and status
//! publisher, plus the sensor interval timer.  It exposes a
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, so the whole loop is testable with mock adapters.
//!
//! ```text
//!  SensorPort    ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  CommandSource ──▶ │          Thermostat          │
//!  ActuatorPort  ◀── │  Gate · PID · Staging · Mode │
//!                    └──────────────────────────────┘
//! ```
//!
//! One [`tick`](Thermostat::tick) is, in order: staging step on the
//! controller output, sensor sample on interval expiry, command drain,
//! relay writes and status publication.

use log::{info, warn};

use crate::config::ThermostatConfig;
use crate::control::adapter::ControllerAdapter;
use crate::control::pid::PidController;
use crate::control::staging::StagedActuator;
use crate::fsm::StateId;
use crate::fsm::context::{ActuatorState, HeatingState};
use crate::sensors::{Measurement, Probe, SensorGate};
use crate::timer::Countdown;

use super::commands::{AppCommand, ControlMode};
use super::events::{AppEvent, TelemetryData};
use super::mode::{CommandEffect, ModeController};
use super::ports::{ActuatorPort, Channel, CommandSource, EventSink, FeedbackController, SensorPort};
use super::status::StatusPublisher;

// ───────────────────────────────────────────────────────────────
// Thermostat
// ───────────────────────────────────────────────────────────────

pub struct Thermostat<C: FeedbackController = PidController> {
    config: ThermostatConfig,
    gate: SensorGate,
    adapter: ControllerAdapter<C>,
    staging: StagedActuator,
    mode: ModeController,
    publisher: StatusPublisher,
    /// Next climate probe read.
    sensor_timer: Countdown,
    /// Relay levels confirmed written through the ActuatorPort.
    applied: ActuatorState,
    /// Relay state carried by the last status line.
    published: ActuatorState,
    reported_heating: HeatingState,
    last_tick_secs: u64,
}

impl Thermostat<PidController> {
    /// Construct the service around the built-in PID controller.
    pub fn new(config: ThermostatConfig) -> Self {
        let pid = PidController::new(config.kp, config.ki, config.kd, config.default_setpoint_c);
        Self::with_controller(pid, config)
    }
}

impl<C: FeedbackController> Thermostat<C> {
    /// Construct the service around any controller.  Does **not** touch
    /// hardware. Call [`start`](Self::start) next.
    pub fn with_controller(controller: C, config: ThermostatConfig) -> Self {
        let adapter = ControllerAdapter::new(controller, &config);
        let staging = StagedActuator::new(&config);
        Self {
            gate: SensorGate::new(),
            adapter,
            staging,
            mode: ModeController::new(),
            publisher: StatusPublisher::new(),
            sensor_timer: Countdown::new(),
            applied: ActuatorState::all_off(),
            published: ActuatorState::all_off(),
            reported_heating: HeatingState::Off,
            last_tick_secs: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Boot sequence: relays off, probes primed, boot mode applied,
    /// initial status published, first sample scheduled one interval out.
    pub fn start(
        &mut self,
        now_secs: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.last_tick_secs = now_secs;
        self.staging.start(now_secs);
        for channel in [Channel::Heater1, Channel::Heater2, Channel::Fan] {
            if let Err(e) = hw.write(channel, false) {
                warn!("{:?}: initial off failed: {}", channel, e);
            }
        }

        self.gate.prime(hw);

        let effect = self.apply_command(AppCommand::SetMode(self.config.boot_mode), now_secs);
        self.acknowledge(effect, sink);

        sink.emit(&AppEvent::Started(self.mode.mode()));
        self.sync_outputs(hw, sink, true);
        self.sensor_timer.arm(now_secs, self.config.sensor_interval_secs);
        info!("thermostat started in {:?}", self.mode.mode());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one pass of the control loop.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`], which avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_secs: u64,
        hw: &mut (impl SensorPort + ActuatorPort),
        inbox: &mut impl CommandSource,
        sink: &mut impl EventSink,
    ) {
        self.last_tick_secs = now_secs;

        // 1. Controller + staging, only once the indoor probe has ever read
        if self.gate.has_valid_primary() {
            let output = self.adapter.compute(now_secs);
            self.staging.step(now_secs, output, self.adapter.is_enabled());
        }

        // 2. Climate probes on their own interval
        if self.sensor_timer.expired(now_secs) {
            let outcome = self.gate.sample(hw, now_secs, sink);
            if outcome.indoor.is_some() {
                self.adapter.feed(&self.gate.measurement(Probe::Indoor));
            }
            self.sensor_timer.arm(now_secs, self.config.sensor_interval_secs);
        }

        // 3. Remote commands
        let mut force_status = false;
        while let Some(cmd) = inbox.next_command() {
            let effect = self.apply_command(cmd, now_secs);
            force_status |= effect.publish_status;
            self.acknowledge(effect, sink);
        }

        // 4. Relays + status
        self.sync_outputs(hw, sink, force_status);
    }

    // ── Command handling ──────────────────────────────────────

    /// Handle one command outside the tick.  Relays
    /// and status are brought up to date before returning.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        now_secs: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        let effect = self.apply_command(cmd, now_secs);
        self.acknowledge(effect, sink);
        self.sync_outputs(hw, sink, effect.publish_status);
    }

    fn apply_command(&mut self, cmd: AppCommand, now_secs: u64) -> CommandEffect {
        info!("command: {:?}", cmd);
        self.mode
            .on_command(cmd, now_secs, &mut self.adapter, &mut self.staging)
    }

    fn acknowledge(&self, effect: CommandEffect, sink: &mut impl EventSink) {
        if let Some(mode) = effect.accepted_mode {
            sink.emit(&AppEvent::ModeAccepted(mode));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot as of the last tick.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            uptime_secs: self.last_tick_secs,
            state: self.staging.state(),
            mode: self.mode.mode(),
            setpoint_c: self.adapter.setpoint(),
            controller_output: self.adapter.output(),
            indoor: self.gate.measurement(Probe::Indoor),
            outdoor: self.gate.measurement(Probe::Outdoor),
            actuators: self.staging.actuators(),
            heating: self.staging.heating_state(),
        }
    }

    /// Current staging state.
    pub fn state(&self) -> StateId {
        self.staging.state()
    }

    pub fn mode(&self) -> ControlMode {
        self.mode.mode()
    }

    pub fn setpoint(&self) -> f32 {
        self.adapter.setpoint()
    }

    pub fn controller_enabled(&self) -> bool {
        self.adapter.is_enabled()
    }

    /// Logical relay commands.
    pub fn actuators(&self) -> ActuatorState {
        self.staging.actuators()
    }

    pub fn heating_state(&self) -> HeatingState {
        self.staging.heating_state()
    }

    pub fn measurement(&self, probe: Probe) -> Measurement {
        self.gate.measurement(probe)
    }

    pub fn has_valid_measurement(&self) -> bool {
        self.gate.has_valid_primary()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Write relay differences, then report heating state and status.
    fn sync_outputs(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink, force_status: bool) {
        let want = self.staging.actuators();
        self.write_relays(hw, want);

        let heating = self.staging.heating_state();
        if heating != self.reported_heating {
            self.reported_heating = heating;
            sink.emit(&AppEvent::HeatingState(heating));
        }

        if force_status || want != self.published {
            self.published = want;
            self.publisher.publish(&want, sink);
        }
    }

    /// Switch-offs go out heaters first, switch-ons fan first, so a heater
    /// is never energised without the fan.  A failed write is retried on
    /// the next pass.
    fn write_relays(&mut self, hw: &mut impl ActuatorPort, want: ActuatorState) {
        let offs = [
            (Channel::Heater1, want.heater1),
            (Channel::Heater2, want.heater2),
            (Channel::Fan, want.fan),
        ];
        let ons = [
            (Channel::Fan, want.fan),
            (Channel::Heater1, want.heater1),
            (Channel::Heater2, want.heater2),
        ];

        for (channel, on) in offs.into_iter().filter(|(_, on)| !on) {
            self.write_channel(hw, channel, on);
        }
        for (channel, on) in ons.into_iter().filter(|(_, on)| *on) {
            self.write_channel(hw, channel, on);
        }
    }

    fn write_channel(&mut self, hw: &mut impl ActuatorPort, channel: Channel, on: bool) {
        let applied = match channel {
            Channel::Fan => &mut self.applied.fan,
            Channel::Heater1 => &mut self.applied.heater1,
            Channel::Heater2 => &mut self.applied.heater2,
        };
        if *applied == on {
            return;
        }
        match hw.write(channel, on) {
            Ok(()) => *applied = on,
            Err(e) => warn!("{:?} -> {}: {}", channel, if on { "on" } else { "off" }, e),
        }
    }
}
