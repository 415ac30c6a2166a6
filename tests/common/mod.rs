#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use embedded_hal::i2c::ErrorKind;
use hyt271::{BusManager, Callback, Scheduler, TransportError, TransportSession};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Collects registrations and runs them only when told to.
#[derive(Default)]
pub struct ManualScheduler {
    pub registrations: Vec<(Duration, Callback)>,
}

impl ManualScheduler {
    pub fn fire(&mut self) {
        for (_, callback) in &mut self.registrations {
            callback();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn register_periodic(&mut self, period: Duration, callback: Callback) -> io::Result<()> {
        self.registrations.push((period, callback));
        Ok(())
    }
}

/// Answers every read with the next sample from a fixed rotation.
pub struct RotatingSession {
    samples: Vec<[u8; 4]>,
    reads: AtomicUsize,
    lock: ReentrantMutex<()>,
}

impl RotatingSession {
    pub fn new(samples: Vec<[u8; 4]>) -> Self {
        Self {
            samples,
            reads: AtomicUsize::new(0),
            lock: ReentrantMutex::new(()),
        }
    }
}

impl TransportSession for RotatingSession {
    type Lock<'a>
        = ReentrantMutexGuard<'a, ()>
    where
        Self: 'a;

    fn lock(&self) -> Self::Lock<'_> {
        self.lock.lock()
    }

    fn transfer(&self, send: &[u8], recv: &mut [u8]) -> Result<(), TransportError> {
        let _guard = self.lock.lock();
        if recv.is_empty() {
            assert_eq!(send, &[0x00]);
            return Ok(());
        }
        if self.samples.is_empty() {
            return Err(TransportError {
                kind: ErrorKind::Other,
                attempts: 1,
            });
        }
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        recv.copy_from_slice(&self.samples[n % self.samples.len()]);
        Ok(())
    }

    fn set_retries(&self, _retries: u8) {}

    fn set_address(&self, _address: u8) {}

    fn address(&self) -> u8 {
        hyt271::DEFAULT_ADDRESS
    }
}

/// Hands out a single pre-built session.
pub struct OneShotBus<S>(pub parking_lot::Mutex<Option<S>>);

impl<S> OneShotBus<S> {
    pub fn new(session: S) -> Self {
        Self(parking_lot::Mutex::new(Some(session)))
    }
}

impl<S: TransportSession> BusManager for OneShotBus<S> {
    type Session = S;

    fn get_device(&self, _bus: u8, _address: u8) -> Option<S> {
        self.0.lock().take()
    }
}

/// Every read returns a larger raw humidity than the one before.
pub struct CountingSession {
    reads: AtomicUsize,
    lock: ReentrantMutex<()>,
}

impl CountingSession {
    pub fn new() -> Self {
        Self {
            reads: AtomicUsize::new(0),
            lock: ReentrantMutex::new(()),
        }
    }
}

impl TransportSession for CountingSession {
    type Lock<'a>
        = ReentrantMutexGuard<'a, ()>
    where
        Self: 'a;

    fn lock(&self) -> Self::Lock<'_> {
        self.lock.lock()
    }

    fn transfer(&self, _send: &[u8], recv: &mut [u8]) -> Result<(), TransportError> {
        let _guard = self.lock.lock();
        if recv.is_empty() {
            return Ok(());
        }
        let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
        let raw = u16::try_from(n).unwrap_or(u16::MAX) & 0x3FFF;
        let [hi, lo] = raw.to_be_bytes();
        recv.copy_from_slice(&[hi, lo, 0x00, 0x00]);
        Ok(())
    }

    fn set_retries(&self, _retries: u8) {}

    fn set_address(&self, _address: u8) {}

    fn address(&self) -> u8 {
        hyt271::DEFAULT_ADDRESS
    }
}
