//! Mode and setpoint command handling.
//!
//! Translates [`AppCommand`]s into controller enable/disable and setpoint
//! calls, and into the mode-off shutdown of the staging machine.

use log::info;

use super::commands::{AppCommand, ControlMode};
use crate::app::ports::FeedbackController;
use crate::control::adapter::ControllerAdapter;
use crate::control::staging::StagedActuator;

/// What a handled command asks the service to do next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandEffect {
    /// A mode command was accepted (acknowledged even when it is a no-op).
    pub accepted_mode: Option<ControlMode>,
    /// Publish status once, whether or not any relay changed.
    pub publish_status: bool,
}

#[derive(Debug)]
pub struct ModeController {
    /// Mode the control loop is running in.  Only `Off` and `Auto` change it.
    mode: ControlMode,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            mode: ControlMode::Off,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn on_command<C: FeedbackController>(
        &mut self,
        cmd: AppCommand,
        now_secs: u64,
        adapter: &mut ControllerAdapter<C>,
        staging: &mut StagedActuator,
    ) -> CommandEffect {
        match cmd {
            AppCommand::SetMode(ControlMode::Off) => {
                info!("mode -> Off");
                adapter.set_enabled(false);
                staging.shutdown(now_secs);
                self.mode = ControlMode::Off;
                CommandEffect {
                    accepted_mode: Some(ControlMode::Off),
                    publish_status: true,
                }
            }
            AppCommand::SetMode(ControlMode::Auto) => {
                if adapter.set_enabled(true) {
                    info!("mode -> Auto");
                }
                self.mode = ControlMode::Auto;
                CommandEffect {
                    accepted_mode: Some(ControlMode::Auto),
                    publish_status: false,
                }
            }
            AppCommand::SetMode(requested @ (ControlMode::Heat | ControlMode::Cool)) => {
                // Accepted but not acted on; staging keeps following `Auto`/`Off`.
                info!("mode {:?} accepted, no change (running {:?})", requested, self.mode);
                CommandEffect {
                    accepted_mode: Some(requested),
                    publish_status: false,
                }
            }
            AppCommand::SetSetpoint(setpoint_c) => {
                adapter.set_setpoint(setpoint_c);
                CommandEffect::default()
            }
            AppCommand::Other => CommandEffect::default(),
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
