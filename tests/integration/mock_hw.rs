//! Mock adapters for integration tests.
//!
//! Records every relay write and every emitted event so tests can assert
//! on the full history without touching real GPIO.  The scripted
//! controller hands its output to the test through a shared handle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use heatstage::app::commands::AppCommand;
use heatstage::app::events::AppEvent;
use heatstage::app::ports::{
    ActuatorPort, Channel, CommandSource, EventSink, FeedbackController, SensorPort,
};
use heatstage::app::service::Thermostat;
use heatstage::config::ThermostatConfig;
use heatstage::error::{ActuatorError, SensorError};
use heatstage::fsm::context::ActuatorState;
use heatstage::sensors::{ClimateReading, Probe};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// `None` makes every read of that probe fail.
    pub indoor: Option<ClimateReading>,
    pub outdoor: Option<ClimateReading>,
    pub writes: Vec<(Channel, bool)>,
    pub levels: ActuatorState,
    pub fail_writes: bool,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            indoor: None,
            outdoor: None,
            writes: Vec::new(),
            levels: ActuatorState::all_off(),
            fail_writes: false,
            reads: 0,
        }
    }

    pub fn with_indoor(temperature_c: f32) -> Self {
        let mut hw = Self::new();
        hw.indoor = Some(ClimateReading {
            temperature_c,
            humidity_pct: 55.0,
        });
        hw.outdoor = Some(ClimateReading {
            temperature_c: -3.0,
            humidity_pct: 80.0,
        });
        hw
    }

    /// Writes that switched something on.
    pub fn on_writes(&self) -> usize {
        self.writes.iter().filter(|(_, on)| *on).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self, probe: Probe) -> Result<ClimateReading, SensorError> {
        self.reads += 1;
        let reading = match probe {
            Probe::Indoor => self.indoor,
            Probe::Outdoor => self.outdoor,
        };
        reading.ok_or(SensorError::Timeout)
    }
}

impl ActuatorPort for MockHardware {
    fn write(&mut self, channel: Channel, on: bool) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.writes.push((channel, on));
        match channel {
            Channel::Fan => self.levels.fan = on,
            Channel::Heater1 => self.levels.heater1 = on,
            Channel::Heater2 => self.levels.heater2 = on,
        }
        Ok(())
    }
}

// ── ScriptedController ────────────────────────────────────────

/// What the scripted controller has been told, and what it will answer.
#[derive(Debug, Default)]
pub struct Script {
    pub output: f32,
    pub enabled: bool,
    pub setpoint: f32,
    pub input: Option<f32>,
    pub computes: u32,
    pub limits: Option<(f32, f32)>,
    pub sample_secs: Option<u32>,
}

pub type ScriptHandle = Rc<RefCell<Script>>;

/// Controller whose output is set directly by the test.
pub struct ScriptedController(pub ScriptHandle);

impl FeedbackController for ScriptedController {
    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }
    fn is_enabled(&self) -> bool {
        self.0.borrow().enabled
    }
    fn set_setpoint(&mut self, setpoint: f32) {
        self.0.borrow_mut().setpoint = setpoint;
    }
    fn setpoint(&self) -> f32 {
        self.0.borrow().setpoint
    }
    fn set_input(&mut self, input: f32) {
        self.0.borrow_mut().input = Some(input);
    }
    fn compute(&mut self, _now_secs: u64) -> f32 {
        let mut s = self.0.borrow_mut();
        s.computes += 1;
        s.output
    }
    fn output(&self) -> f32 {
        self.0.borrow().output
    }
    fn set_output_limits(&mut self, min: f32, max: f32) {
        self.0.borrow_mut().limits = Some((min, max));
    }
    fn set_sample_time(&mut self, secs: u32) {
        self.0.borrow_mut().sample_secs = Some(secs);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(text) => Some(text.as_str().to_owned()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── QueueInbox ────────────────────────────────────────────────

#[derive(Default)]
pub struct QueueInbox {
    pub pending: VecDeque<AppCommand>,
}

#[allow(dead_code)]
impl QueueInbox {
    pub fn push(&mut self, cmd: AppCommand) {
        self.pending.push_back(cmd);
    }
}

impl CommandSource for QueueInbox {
    fn next_command(&mut self) -> Option<AppCommand> {
        self.pending.pop_front()
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started thermostat wired to mocks, driven one second per tick.
pub struct Rig {
    pub thermostat: Thermostat<ScriptedController>,
    pub script: ScriptHandle,
    pub hw: MockHardware,
    pub sink: RecordingSink,
    pub inbox: QueueInbox,
}

#[allow(dead_code)]
impl Rig {
    pub fn start(hw: MockHardware) -> Self {
        Self::start_with(hw, ThermostatConfig::default())
    }

    pub fn start_with(mut hw: MockHardware, config: ThermostatConfig) -> Self {
        let script = ScriptHandle::default();
        let mut thermostat =
            Thermostat::with_controller(ScriptedController(script.clone()), config);
        let mut sink = RecordingSink::new();
        thermostat.start(0, &mut hw, &mut sink);
        Self {
            thermostat,
            script,
            hw,
            sink,
            inbox: QueueInbox::default(),
        }
    }

    pub fn set_output(&self, output: f32) {
        self.script.borrow_mut().output = output;
    }

    pub fn tick(&mut self, now_secs: u64) {
        self.thermostat
            .tick(now_secs, &mut self.hw, &mut self.inbox, &mut self.sink);
    }

    /// Tick every second over `from..=to`.
    pub fn run(&mut self, from: u64, to: u64) {
        for now in from..=to {
            self.tick(now);
        }
    }

    pub fn command(&mut self, cmd: AppCommand) {
        self.inbox.push(cmd);
    }
}
