use embedded_hal::i2c::ErrorKind;

/// A bus exchange that did not complete, even after retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("bus transfer failed after {attempts} attempt(s): {kind}")]
pub struct TransportError {
    pub kind: ErrorKind,
    pub attempts: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bus manager has no device for this bus/address pair
    #[error("no transport session for address {address:#04x} on bus {bus}")]
    SessionUnavailable { bus: u8, address: u8 },

    #[error("driver already holds a transport session")]
    AlreadyInitialized,

    #[error("driver has no transport session")]
    NotInitialized,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Status bit 0x40 was set in the fetched sample
    #[error("sensor returned a stale sample")]
    StaleSample,

    #[error("failed to register periodic callback: {0}")]
    Scheduler(#[from] std::io::Error),
}
