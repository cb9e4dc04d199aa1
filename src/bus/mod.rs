use crate::error::BusError;
use crate::status::BusStatus;

pub mod four_wire;
pub mod two_wire;

pub use self::four_wire::FourWire;
pub use self::two_wire::TwoWire;

/// A bus master whose transactions are advanced from its interrupt handler.
///
/// Starting a transaction is engine specific; everything after the start is
/// common to both engines.
pub trait Bus {
    fn status(&self) -> BusStatus;

    /// Return a `Finished` or `Error` bus to `Idle`. Refused while a
    /// transaction is in flight.
    fn acknowledge_idle(&self) -> bool;

    /// Advance the current transaction. Called once per interrupt occurrence.
    fn on_interrupt(&mut self);

    /// Cause of the last failure while [`status`](Bus::status) is `Error`.
    fn error(&self) -> Option<BusError>;

    /// Non-blocking completion check, usable with `nb::block!`.
    fn poll(&self) -> nb::Result<(), BusError> {
        match self.status() {
            BusStatus::InProgress => Err(nb::Error::WouldBlock),
            BusStatus::Idle | BusStatus::Finished => Ok(()),
            BusStatus::Error => Err(nb::Error::Other(
                self.error().unwrap_or(BusError::NoAcknowledge),
            )),
        }
    }
}
