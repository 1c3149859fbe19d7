//! Application core — pure domain logic, zero I/O.
//!
//! This module holds the thermostat's rules: the control-loop service,
//! mode and setpoint handling, and status formatting.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod mode;
pub mod ports;
pub mod service;
pub mod status;
