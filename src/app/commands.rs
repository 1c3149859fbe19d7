//! Inbound commands to the thermostat service.
//!
//! The remote device layer delivers characteristic writes as
//! `(characteristic, value)` pairs.  [`AppCommand::from_remote`] turns
//! them into a closed set of commands that the
//! [`ModeController`](super::mode::ModeController) matches exhaustively.

use serde::{Deserialize, Serialize};

/// Target heating/cooling mode requested from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    Off,
    Heat,
    Cool,
    Auto,
}

impl ControlMode {
    /// Decode the accessory's target-state value (0 Off, 1 Heat, 2 Cool,
    /// 3 Auto).  Anything else is not a mode.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Off),
            1 => Some(Self::Heat),
            2 => Some(Self::Cool),
            3 => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Heat => 1,
            Self::Cool => 2,
            Self::Auto => 3,
        }
    }
}

/// Thermostat characteristics that accept remote writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Characteristic {
    TargetHeatingCoolingState,
    TargetTemperature,
    /// Any other accessory/characteristic on the device.
    Unhandled,
}

/// Value carried by a remote characteristic write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteValue {
    Bool(bool),
    UInt8(u8),
    Int32(i32),
    Float(f32),
    /// String payloads are not interpreted by the thermostat.
    Text,
}

/// Commands that external adapters can send into the thermostat core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    SetMode(ControlMode),
    /// New setpoint (°C), forwarded as-is to the controller adapter.
    SetSetpoint(f32),
    /// Accepted and ignored.
    Other,
}

impl AppCommand {
    /// Decode a remote characteristic write.
    pub fn from_remote(characteristic: Characteristic, value: RemoteValue) -> Self {
        match (characteristic, value) {
            (Characteristic::TargetHeatingCoolingState, RemoteValue::UInt8(raw)) => {
                ControlMode::from_raw(raw).map_or(Self::Other, Self::SetMode)
            }
            (Characteristic::TargetTemperature, RemoteValue::Float(c)) => Self::SetSetpoint(c),
            _ => Self::Other,
        }
    }
}
