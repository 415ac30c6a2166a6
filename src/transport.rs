//! Bus-side collaborators of the driver.

mod i2c;

pub use i2c::{I2cBusManager, I2cSession};

use crate::error::TransportError;

/// A point-to-point exchange channel to one addressable device.
///
/// Every [`transfer`](TransportSession::transfer) is serialized against other
/// users of the same bus. [`lock`](TransportSession::lock) holds that
/// serialization across several exchanges; it must be reentrant so that
/// transfers issued while holding it do not deadlock.
pub trait TransportSession: Send + Sync {
    type Lock<'a>
    where
        Self: 'a;

    fn lock(&self) -> Self::Lock<'_>;

    /// Write `send`, then read `recv.len()` bytes. Either side may be empty.
    fn transfer(&self, send: &[u8], recv: &mut [u8]) -> Result<(), TransportError>;

    /// Extra attempts made after a failed exchange
    fn set_retries(&self, retries: u8);

    fn set_address(&self, address: u8);

    fn address(&self) -> u8;
}

/// Hands out sessions for devices on the buses it owns.
pub trait BusManager {
    type Session: TransportSession;

    /// Returns `None` when the bus does not exist or the address is not usable.
    fn get_device(&self, bus: u8, address: u8) -> Option<Self::Session>;
}
