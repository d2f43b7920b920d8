use thiserror::Error;

/// Errors raised by a tracing session.
///
/// Every variant except `Io` leaves the session unusable: the event log is
/// order-sensitive and cannot be repaired once pairing has gone wrong.
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("tracing session is already active")]
    AlreadyActive,

    #[error("tracing session is not active")]
    NotActive,

    #[error("another invocation observer is installed on this thread")]
    ObserverInstalled,

    #[error("return observed with no pending call (pairing underflow)")]
    PairingUnderflow,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TraceError>;
