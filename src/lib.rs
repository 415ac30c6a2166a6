//! Periodic driver for the HYT271 humidity/temperature sensor.
//!
//! The sensor speaks a two-phase protocol: a single `0x00` byte starts a
//! conversion, and a later 4-byte read fetches the result. [`Hyt271`] keeps
//! the device cycling through that protocol from a periodic tick and
//! publishes the latest [`Reading`] together with a health flag.
//!
//! The bus and the timer are injected: a [`BusManager`] hands out a
//! [`TransportSession`] for the device, and a [`Scheduler`] owns the period.
//! [`I2cBusManager`] and [`ThreadScheduler`] are the stock implementations.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod sensors;
pub mod transport;

pub use config::DriverConfig;
pub use error::{Error, TransportError};
pub use scheduler::{Callback, Scheduler, ThreadScheduler};
pub use sensors::{
    Hyt271, Measurement, Phase, RawSample, Reading, Sensor, Snapshot, DEFAULT_ADDRESS,
};
pub use transport::{BusManager, I2cBusManager, I2cSession, TransportSession};
