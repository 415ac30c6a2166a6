use std::cell::RefCell;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use log::trace;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use super::{BusManager, TransportSession};
use crate::error::TransportError;

/// Highest valid 7-bit address
const MAX_ADDRESS: u8 = 0x7F;

type SharedBus<I> = Arc<ReentrantMutex<RefCell<I>>>;

/// Owns one or more I2C buses and opens [`I2cSession`]s on them.
///
/// Bus identifiers are handed out in the order buses are added, starting at 0.
pub struct I2cBusManager<I> {
    buses: Vec<SharedBus<I>>,
}

impl<I: I2c> I2cBusManager<I> {
    pub fn new() -> Self {
        Self { buses: Vec::new() }
    }

    /// Adds a bus and returns its identifier, or `None` once 256 buses are registered.
    pub fn add_bus(&mut self, i2c: I) -> Option<u8> {
        let id = u8::try_from(self.buses.len()).ok()?;
        self.buses.push(Arc::new(ReentrantMutex::new(RefCell::new(i2c))));
        Some(id)
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }
}

impl<I: I2c> Default for I2cBusManager<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: I2c + Send> BusManager for I2cBusManager<I> {
    type Session = I2cSession<I>;

    fn get_device(&self, bus: u8, address: u8) -> Option<I2cSession<I>> {
        if address > MAX_ADDRESS {
            return None;
        }
        let shared = self.buses.get(usize::from(bus))?;
        Some(I2cSession::new(Arc::clone(shared), address))
    }
}

/// One device on a shared I2C bus.
pub struct I2cSession<I> {
    bus: SharedBus<I>,
    address: AtomicU8,
    retries: AtomicU8,
}

impl<I: I2c> I2cSession<I> {
    fn new(bus: SharedBus<I>, address: u8) -> Self {
        Self {
            bus,
            address: AtomicU8::new(address),
            retries: AtomicU8::new(0),
        }
    }

    pub fn retries(&self) -> u8 {
        self.retries.load(Ordering::Relaxed)
    }

    fn exchange(i2c: &mut I, address: u8, send: &[u8], recv: &mut [u8]) -> Result<(), ErrorKind> {
        let result = match (send.is_empty(), recv.is_empty()) {
            (_, true) => i2c.write(address, send),
            (true, false) => i2c.read(address, recv),
            (false, false) => i2c.write_read(address, send, recv),
        };
        result.map_err(|e| e.kind())
    }
}

impl<I: I2c + Send> TransportSession for I2cSession<I> {
    type Lock<'a>
        = ReentrantMutexGuard<'a, RefCell<I>>
    where
        Self: 'a;

    fn lock(&self) -> Self::Lock<'_> {
        self.bus.lock()
    }

    fn transfer(&self, send: &[u8], recv: &mut [u8]) -> Result<(), TransportError> {
        let bus = self.bus.lock();
        let address = self.address.load(Ordering::Relaxed);
        let attempts = u16::from(self.retries.load(Ordering::Relaxed)) + 1;

        let mut kind = ErrorKind::Other;
        for attempt in 1..=attempts {
            match Self::exchange(&mut bus.borrow_mut(), address, send, recv) {
                Ok(()) => return Ok(()),
                Err(err) => {
                    trace!(
                        "i2c {:#04x}: attempt {}/{} failed: {}",
                        address,
                        attempt,
                        attempts,
                        err
                    );
                    kind = err;
                }
            }
        }
        Err(TransportError { kind, attempts })
    }

    fn set_retries(&self, retries: u8) {
        self.retries.store(retries, Ordering::Relaxed);
    }

    fn set_address(&self, address: u8) {
        if address > MAX_ADDRESS {
            trace!("i2c: ignoring out-of-range address {:#04x}", address);
            return;
        }
        self.address.store(address, Ordering::Relaxed);
    }

    fn address(&self) -> u8 {
        self.address.load(Ordering::Relaxed)
    }
}
