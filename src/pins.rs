//! GPIO pin assignments for the ESP32 relay board.
//!
//! Single source of truth — the boot path references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relays (inputs are active LOW)
// ---------------------------------------------------------------------------

pub const RELAY1_GPIO: i32 = 14;
pub const RELAY2_GPIO: i32 = 12;
pub const RELAY3_GPIO: i32 = 13;

pub const FAN_GPIO: i32 = RELAY1_GPIO;
pub const HEATER1_GPIO: i32 = RELAY2_GPIO;
pub const HEATER2_GPIO: i32 = RELAY3_GPIO;

/// The relay inputs energise the coil when driven LOW.
pub const RELAY_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// DHT22 climate probes (open-drain single-wire bus, external pull-up)
// ---------------------------------------------------------------------------

/// Probe inside the workshop — feeds the controller.
pub const DHT_INDOOR_GPIO: i32 = 5;
/// Probe outside — reporting only.
pub const DHT_OUTDOOR_GPIO: i32 = 4;
