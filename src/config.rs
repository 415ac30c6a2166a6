use std::time::Duration;

/// Retries used for the synchronous start-up exchange.
pub const INIT_RETRIES: u8 = 10;

/// Retries used by the periodic cycle; a miss is retried on the next tick anyway.
pub const RUN_RETRIES: u8 = 2;

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tunables for [`Hyt271`](crate::Hyt271).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Transport retries while arming the device during init
    pub init_retries: u8,
    /// Transport retries once the periodic cycle is running
    pub run_retries: u8,
    /// Period of the collect-then-rearm tick
    pub poll_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            init_retries: INIT_RETRIES,
            run_retries: RUN_RETRIES,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl DriverConfig {
    /// Slower polling for battery powered nodes
    pub const fn low_power() -> Self {
        Self {
            init_retries: INIT_RETRIES,
            run_retries: RUN_RETRIES,
            poll_interval: Duration::from_secs(1),
        }
    }

    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timing() {
        let config = DriverConfig::default();
        assert_eq!(config.init_retries, 10);
        assert_eq!(config.run_retries, 2);
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn poll_interval_override_keeps_retries() {
        let config = DriverConfig::default().with_poll_interval(Duration::from_millis(250));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.run_retries, RUN_RETRIES);
    }
}
