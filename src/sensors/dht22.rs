//! DHT22 / AM2302 single-wire temperature and humidity probe.
//!
//! The host pulls the data line low for >1 ms, releases it, and the probe
//! answers with an 80 µs low / 80 µs high preamble followed by 40 bits.
//! Each bit is a ~50 µs low followed by a high pulse of ~27 µs (0) or
//! ~70 µs (1).  Bits are classified by comparing the high pulse with the
//! low pulse that precedes it, so the result does not depend on how long
//! one poll iteration takes.
//!
//! Frame layout (big-endian):
//!
//! | byte | content                                    |
//! |------|--------------------------------------------|
//! | 0-1  | relative humidity × 10                     |
//! | 2-3  | temperature × 10, bit 15 = negative sign   |
//! | 4    | low byte of the sum of bytes 0-3           |
//!
//! The data line must be open-drain with a pull-up.  The read is a
//! bounded busy-wait of roughly 5 ms.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use super::ClimateReading;
use crate::error::SensorError;

const START_LOW_US: u32 = 1_100;
/// Upper bound on any single level while waiting for an edge.
const EDGE_TIMEOUT_US: u32 = 100;

const TEMP_MIN_C: f32 = -40.0;
const TEMP_MAX_C: f32 = 80.0;

/// Decode and validate a raw 5-byte frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }

    let humidity_pct = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
    let temperature_c = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if !(0.0..=100.0).contains(&humidity_pct)
        || !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temperature_c)
    {
        return Err(SensorError::OutOfRange);
    }

    Ok(ClimateReading {
        temperature_c,
        humidity_pct,
    })
}

/// Bit-banged DHT22 driver over an open-drain data line.
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// Takes the line and leaves it released (idle high).
    pub fn new(mut pin: P, delay: D) -> Result<Self, SensorError> {
        pin.set_high().map_err(|_| {
            warn!("dht22: could not release data line");
            SensorError::Bus
        })?;
        Ok(Self { pin, delay })
    }

    /// One complete start/response/40-bit transaction.
    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        let frame = self.read_frame()?;
        decode_frame(frame)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        // Start signal.
        self.pin.set_low().map_err(|_| SensorError::Bus)?;
        self.delay.delay_us(START_LOW_US);
        self.pin.set_high().map_err(|_| SensorError::Bus)?;

        // Preamble: pull-up high, then the probe's 80 µs low and 80 µs high.
        self.wait_while(true).map_err(|_| SensorError::NoResponse)?;
        self.wait_while(false).map_err(|_| SensorError::NoResponse)?;
        self.wait_while(true).map_err(|_| SensorError::NoResponse)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            let low_us = self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > low_us {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }

    /// Poll until the line leaves `high`, returning the time spent (µs).
    fn wait_while(&mut self, high: bool) -> Result<u32, SensorError> {
        let mut elapsed_us = 0;
        while self.pin.is_high().map_err(|_| SensorError::Bus)? == high {
            if elapsed_us >= EDGE_TIMEOUT_US {
                return Err(SensorError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed_us += 1;
        }
        Ok(elapsed_us)
    }
}
