use std::sync::Arc;
use std::thread;

use anyhow::anyhow;
use core::time::Duration;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::hal::units::FromValueType;
use esp_idf_svc::log::EspLogger;
use log::{debug, info, trace};

use hyt271::{Hyt271, I2cBusManager, Sensor, ThreadScheduler, DEFAULT_ADDRESS};

const I2C_BAUDRATE_KHZ: u32 = 100;

const REPORT_INTERVAL_SEC: u64 = 10;

fn preamble() {
    esp_idf_svc::sys::link_patches();
    EspLogger::initialize_default();
}

fn main() -> anyhow::Result<()> {
    preamble();

    let peripherals = Peripherals::take()?;

    let config = I2cConfig::new().baudrate(I2C_BAUDRATE_KHZ.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio9,
        peripherals.pins.gpio8,
        &config,
    )?;

    let mut buses = I2cBusManager::new();
    let bus = buses.add_bus(i2c).ok_or_else(|| anyhow!("no free bus slot"))?;

    let mut scheduler = ThreadScheduler::new();
    let sensor = Arc::new(Hyt271::new());
    sensor.init(&buses, &mut scheduler, bus, DEFAULT_ADDRESS)?;

    trace!("Calling run");

    run(sensor.as_ref())
}

fn run(sensor: &impl Sensor) -> ! {
    debug!("Starting report loop");
    loop {
        for measurement in sensor.measurements() {
            info!("{} {}: {}", sensor.name(), measurement.name, measurement.value);
        }
        thread::sleep(Duration::from_secs(REPORT_INTERVAL_SEC));
    }
}
