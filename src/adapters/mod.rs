//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                  |
//! |------------|-----------------|------------------------------|
//! | `hardware` | SensorPort      | DHT22 probes (GPIO)          |
//! |            | ActuatorPort    | Relay board (GPIO)           |
//! | `log_sink` | EventSink       | Serial log output            |
//! | `remote`   | CommandSource   | Accessory transport callback |
//! | `time`     | Clock           | ESP32 system timer           |

pub mod hardware;
pub mod log_sink;
pub mod remote;
pub mod time;
