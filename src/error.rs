//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (Base64 buffers and text,
//! driver configuration, driver lifecycle).
use crate::protocol::listen_only::session::DriverState;
use thiserror_no_std::Error;

//================================================================================BASE64_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised by the Base64 encoder and decoder.
///
/// The encoder itself is total: it can only fail when the caller hands it
/// storage that cannot hold the result.
pub enum Base64Error {
    /// Output storage is smaller than the encoded or decoded result.
    #[error("Buffer too small -> required: {required}, available: {available}")]
    BufferTooSmall { required: usize, available: usize },
    /// Encoded text length is not a multiple of four.
    #[error("Base64 text length must be a multiple of 4, got {len}")]
    InvalidLength { len: usize },
    /// Symbol outside the Base64 alphabet.
    #[error("Invalid Base64 symbol {symbol:#04x} at position {position}")]
    InvalidSymbol { position: usize, symbol: u8 },
    /// Padding found anywhere but the tail of the last group.
    #[error("Misplaced padding at position {position}")]
    InvalidPadding { position: usize },
}

//================================================================================CONFIG_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Driver configuration rejected before installation.
pub enum ConfigError {
    /// Listen-only nodes never transmit, so their TX queue must stay empty.
    #[error("Listen-only mode requires an empty TX queue, got {len}")]
    TxQueueInListenOnly { len: u32 },
    /// Frames cannot be received without an RX queue.
    #[error("RX queue length must be greater than zero")]
    EmptyRxQueue,
    /// TX and RX are routed to the same pin.
    #[error("TX and RX share GPIO {pin}")]
    PinConflict { pin: u8 },
}

//================================================================================SESSION_ERROR

#[derive(Error, Debug)]
/// Failures of the driver lifecycle (install → start → stop → uninstall).
///
/// Every variant is fatal for the running session.
pub enum SessionError<E: core::fmt::Debug> {
    /// Lifecycle step requested from the wrong state.
    #[error("Invalid driver state -> expected: {expected:?}, actual: {actual:?}")]
    InvalidState {
        expected: DriverState,
        actual: DriverState,
    },
    /// Configuration did not pass validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The underlying driver reported an error.
    #[error("CAN driver error: {0:?}")]
    Driver(E),
}
