#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub value: f32,
}

pub trait Sensor {
    fn name(&self) -> &'static str;

    /// Latest values this sensor has published; empty while it is unhealthy.
    fn measurements(&self) -> Vec<Measurement>;
}
