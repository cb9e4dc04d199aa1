use core::convert::Infallible;
use core::fmt::Debug;

use crate::status::BusStatus;

/// Why a request to start a transaction was turned down.
///
/// A rejected request leaves the bus, its buffers and its status exactly as they
/// were; the caller is expected to retry once [`Bus::status`](crate::bus::Bus::status)
/// reports [`BusStatus::Idle`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError<E: Debug = Infallible> {
    /// A transaction is still in flight.
    Busy,
    /// The outcome of the previous transaction has not been acknowledged yet.
    Unacknowledged,
    /// The bus is still busy or a stop condition has not completed.
    BusNotIdle,
    /// A length is zero or exceeds the buffer capacity.
    InvalidLength,
    /// The peer address does not fit the addressing mode.
    InvalidAddress,
    /// No select line exists for the requested peer.
    UnknownPeer,
    /// Asserting the peer-select line failed.
    PeerSelect(#[cfg_attr(feature = "defmt", defmt(Debug2Format))] E),
}

impl<E: Debug> StartError<E> {
    pub(crate) fn from_status(status: BusStatus) -> Self {
        match status {
            BusStatus::InProgress => StartError::Busy,
            _ => StartError::Unacknowledged,
        }
    }
}

/// The cause latched when a transaction ends in [`BusStatus::Error`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The peer did not acknowledge its address or a data byte.
    NoAcknowledge,
    /// The peer-select line could not be released after the transfer.
    PeerRelease,
}

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match self {
            BusError::NoAcknowledge => embedded_hal::i2c::ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Unknown,
            ),
            BusError::PeerRelease => embedded_hal::i2c::ErrorKind::Other,
        }
    }
}

/// Invalid timing parameters handed to a bus constructor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The peripheral clock is too slow to derive the requested bus clock.
    ClockTooSlow,
    /// The resulting divider does not fit the hardware register.
    DividerOutOfRange,
}

/// A transaction outlived its watchdog budget.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout;

/// Failure while bringing up a four-wire bus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError<E: Debug> {
    Config(ConfigError),
    /// A peer-select line could not be de-asserted.
    PeerSelect(#[cfg_attr(feature = "defmt", defmt(Debug2Format))] E),
}

impl<E: Debug> From<ConfigError> for InitError<E> {
    fn from(error: ConfigError) -> Self {
        InitError::Config(error)
    }
}
