//! Raw 4-byte samples and their conversion to physical units.
//!
//! Layout as fetched from the device:
//!
//! ```text
//! byte 0: S S H13..H8   S = status, bit 6 (0x40) flags a stale sample
//! byte 1: H7..H0
//! byte 2: T13..T6
//! byte 3: T5..T0 x x
//! ```

use super::reading::Reading;
use crate::error::Error;

pub const SAMPLE_LEN: usize = 4;

/// Set in byte 0 when the sample was already fetched or is otherwise invalid.
pub const STALE_BIT: u8 = 0x40;

const RAW_MASK: u16 = 0x3FFF;
const RAW_FULL_SCALE: f32 = 16383.0;

const HUMIDITY_SPAN: f32 = 100.0;
const TEMPERATURE_SPAN: f32 = 165.0;
/// -40 °C
const TEMPERATURE_MIN_K: f32 = 233.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSample([u8; SAMPLE_LEN]);

impl RawSample {
    pub const fn new(bytes: [u8; SAMPLE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn is_stale(&self) -> bool {
        self.0[0] & STALE_BIT == STALE_BIT
    }

    pub fn raw_humidity(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]]) & RAW_MASK
    }

    pub fn raw_temperature(&self) -> u16 {
        (u16::from(self.0[2]) << 6) | u16::from(self.0[3] >> 2)
    }

    /// Rejects stale samples, otherwise converts both fields.
    pub fn decode(&self) -> Result<Reading, Error> {
        if self.is_stale() {
            return Err(Error::StaleSample);
        }
        Ok(Reading::new(
            humidity_from_raw(self.raw_humidity()),
            temperature_from_raw(self.raw_temperature()),
        ))
    }
}

impl From<[u8; SAMPLE_LEN]> for RawSample {
    fn from(bytes: [u8; SAMPLE_LEN]) -> Self {
        Self::new(bytes)
    }
}

/// Relative humidity in percent from a 14-bit raw value.
pub fn humidity_from_raw(raw: u16) -> f32 {
    f32::from(raw) * HUMIDITY_SPAN / RAW_FULL_SCALE
}

/// Temperature in Kelvin from a 14-bit raw value.
pub fn temperature_from_raw(raw: u16) -> f32 {
    f32::from(raw) * TEMPERATURE_SPAN / RAW_FULL_SCALE + TEMPERATURE_MIN_K
}
