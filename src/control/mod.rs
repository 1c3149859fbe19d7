//! Control path: the continuous controller, its calling contract, and the
//! heater staging that acts on its output.

pub mod adapter;
pub mod pid;
pub mod staging;
