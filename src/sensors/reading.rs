/// 0 °C in Kelvin
pub const KELVIN_OFFSET: f32 = 273.15;

/// A converted sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent, 0..=100
    pub humidity: f32,
    /// Temperature in Kelvin
    pub temperature: f32,
}

impl Reading {
    pub const fn new(humidity: f32, temperature: f32) -> Self {
        Self {
            humidity,
            temperature,
        }
    }

    pub fn temperature_celsius(&self) -> f32 {
        self.temperature - KELVIN_OFFSET
    }
}

/// The published reading together with the outcome of the last cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub reading: Reading,
    pub healthy: bool,
}
