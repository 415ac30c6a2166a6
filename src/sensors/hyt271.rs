use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use super::reading::{Reading, Snapshot};
use super::sample::{RawSample, SAMPLE_LEN};
use super::trait_def::{Measurement, Sensor};
use crate::config::DriverConfig;
use crate::error::Error;
use crate::scheduler::Scheduler;
use crate::transport::{BusManager, TransportSession};

/// Factory address of the HYT271
pub const DEFAULT_ADDRESS: u8 = 0x28;

const CMD_START_MEASUREMENT: u8 = 0x00;

/// Where the device is in the measure/collect cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// No measurement has been requested yet
    Idle = 0,
    /// Start command sent, the device is converting
    Armed = 1,
    /// Result fetched, next start command not sent yet
    Collected = 2,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Phase::Armed,
            2 => Phase::Collected,
            _ => Phase::Idle,
        }
    }
}

/// HYT271 driver.
///
/// After [`init`](Hyt271::init) the registered tick collects the pending
/// sample, publishes it and immediately re-arms the device. Readers may call
/// the accessors from any thread; the reading and the health flag are always
/// updated together under one lock.
pub struct Hyt271<S> {
    config: DriverConfig,
    session: OnceLock<S>,
    /// Held from fetch to publish so samples are published in bus order
    cycle: Mutex<()>,
    published: Mutex<Snapshot>,
    healthy: AtomicBool,
    running: AtomicBool,
    phase: AtomicU8,
}

impl<S: TransportSession> Hyt271<S> {
    pub fn new() -> Self {
        Self::with_config(DriverConfig::default())
    }

    pub fn with_config(config: DriverConfig) -> Self {
        Self {
            config,
            session: OnceLock::new(),
            cycle: Mutex::new(()),
            published: Mutex::new(Snapshot::default()),
            healthy: AtomicBool::new(false),
            running: AtomicBool::new(false),
            phase: AtomicU8::new(Phase::Idle as u8),
        }
    }

    /// Opens the device, arms the first measurement and starts the periodic tick.
    ///
    /// The session is kept even when arming fails, but no tick is registered and
    /// the driver never produces readings.
    pub fn init<M, T>(
        self: &Arc<Self>,
        buses: &M,
        scheduler: &mut T,
        bus: u8,
        address: u8,
    ) -> Result<(), Error>
    where
        M: BusManager<Session = S>,
        T: Scheduler + ?Sized,
        S: 'static,
    {
        let session = buses
            .get_device(bus, address)
            .ok_or(Error::SessionUnavailable { bus, address })?;
        self.session.set(session).map_err(|_| Error::AlreadyInitialized)?;
        let session = self.session()?;

        {
            let _lock = session.lock();
            session.set_retries(self.config.init_retries);
            if let Err(err) = self.measure() {
                error!("HYT271 at {:#04x} on bus {}: {}", address, bus, err);
                return Err(err);
            }
            session.set_retries(self.config.run_retries);
        }

        let driver = Arc::clone(self);
        scheduler.register_periodic(self.config.poll_interval, Box::new(move || driver.tick()))?;
        self.running.store(true, Ordering::Release);
        info!(
            "HYT271 at {:#04x} on bus {} polling every {:?}",
            address, bus, self.config.poll_interval
        );
        Ok(())
    }

    /// Points the session at a different device address. Does nothing before init.
    pub fn set_address(&self, address: u8) {
        if let Some(session) = self.session.get() {
            session.set_address(address);
        }
    }

    /// Sends the start-measurement command.
    pub fn measure(&self) -> Result<(), Error> {
        self.session()?.transfer(&[CMD_START_MEASUREMENT], &mut [])?;
        self.set_phase(Phase::Armed);
        Ok(())
    }

    /// Fetches the pending sample and publishes it. The health flag is left alone.
    ///
    /// Serialized with [`tick`](Hyt271::tick): a reading published here is never
    /// overwritten by an older sample fetched by a concurrent tick.
    pub fn collect(&self) -> Result<Reading, Error> {
        let _cycle = self.cycle.lock();
        let reading = self.fetch()?;
        self.published.lock().reading = reading;
        Ok(reading)
    }

    /// One collect-then-rearm cycle.
    pub fn tick(&self) {
        let outcome = {
            let _cycle = self.cycle.lock();
            let outcome = self.fetch();
            let healthy = outcome.is_ok();
            let mut published = self.published.lock();
            if let Ok(reading) = &outcome {
                published.reading = *reading;
            }
            published.healthy = healthy;
            self.healthy.store(healthy, Ordering::Release);
            outcome
        };

        match outcome {
            Ok(reading) => debug!(
                "HYT271: {:.2} %RH, {:.2} K",
                reading.humidity, reading.temperature
            ),
            Err(err) => debug!("HYT271 collect failed: {}", err),
        }

        // a failed re-arm surfaces as a failed collect on the next tick
        if let Err(err) = self.measure() {
            debug!("HYT271 re-arm failed: {}", err);
        }
    }

    pub fn humidity(&self) -> f32 {
        self.published.lock().reading.humidity
    }

    pub fn temperature(&self) -> f32 {
        self.published.lock().reading.temperature
    }

    pub fn temperature_celsius(&self) -> f32 {
        self.published.lock().reading.temperature_celsius()
    }

    pub fn reading(&self) -> Reading {
        self.published.lock().reading
    }

    /// Reading and health flag from the same cycle.
    pub fn snapshot(&self) -> Snapshot {
        *self.published.lock()
    }

    /// Lock-free view of the health flag.
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// True once init armed the device and registered the periodic tick.
    pub fn is_initialized(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// True once a session was opened, even if arming the device then failed.
    pub fn has_session(&self) -> bool {
        self.session.get().is_some()
    }

    fn session(&self) -> Result<&S, Error> {
        self.session.get().ok_or(Error::NotInitialized)
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.store(phase as u8, Ordering::Release);
    }

    fn fetch(&self) -> Result<Reading, Error> {
        let mut buf = [0u8; SAMPLE_LEN];
        self.session()?.transfer(&[], &mut buf)?;
        self.set_phase(Phase::Collected);
        RawSample::from(buf).decode()
    }
}

impl<S: TransportSession> Default for Hyt271<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TransportSession> Sensor for Hyt271<S> {
    fn name(&self) -> &'static str {
        "hyt271"
    }

    fn measurements(&self) -> Vec<Measurement> {
        let snapshot = self.snapshot();
        if !snapshot.healthy {
            warn!("HYT271 has no valid reading");
            return vec![];
        }
        vec![
            Measurement {
                name: "humidity".to_string(),
                value: snapshot.reading.humidity,
            },
            Measurement {
                name: "temperature".to_string(),
                value: snapshot.reading.temperature_celsius(),
            },
        ]
    }
}
