mod trait_def;

mod hyt271;
mod reading;
mod sample;

pub use hyt271::{Hyt271, Phase, DEFAULT_ADDRESS};
pub use reading::{Reading, Snapshot};
pub use sample::{humidity_from_raw, temperature_from_raw, RawSample, SAMPLE_LEN, STALE_BIT};
pub use trait_def::{Measurement, Sensor};
