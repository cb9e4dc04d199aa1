#![allow(ambiguous_associated_items)]

use derive_try_from_primitive::TryFromPrimitive;
use portable_atomic::{AtomicU8, Ordering};

/// Liveness of a bus instance as observed by the foreground.
///
/// The only legal sequence is `Idle -> InProgress -> Finished | Error -> Idle`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusStatus {
    /// No transaction is active; a new one may be started.
    Idle = 0,
    /// A transaction has been started and is advanced by the interrupt handler.
    InProgress = 1,
    /// The last transaction completed; the read buffer is valid.
    Finished = 2,
    /// The last transaction was terminated by a bus error.
    Error = 3,
}

/// The status word shared between the foreground and the interrupt handler.
///
/// Each edge of the state machine has exactly one writer and is applied with a
/// compare-and-swap, so neither side can observe or produce a torn value.
#[derive(Debug)]
pub(crate) struct StatusFlag(AtomicU8);

impl StatusFlag {
    pub const fn new() -> Self {
        StatusFlag(AtomicU8::new(BusStatus::Idle as u8))
    }

    pub fn load(&self) -> BusStatus {
        // Only `BusStatus` discriminants are ever stored.
        BusStatus::try_from(self.0.load(Ordering::Acquire)).unwrap_or(BusStatus::Error)
    }

    /// Foreground: `Idle -> InProgress`. Returns the observed status on failure.
    pub fn begin(&self) -> Result<(), BusStatus> {
        self.transition(BusStatus::Idle, BusStatus::InProgress)
    }

    /// Interrupt: `InProgress -> Finished`. A latched `Error` is left untouched.
    pub fn finish(&self) -> bool {
        self.transition(BusStatus::InProgress, BusStatus::Finished).is_ok()
    }

    /// Interrupt: `InProgress -> Error`. Succeeds at most once per transaction.
    pub fn fail(&self) -> bool {
        self.transition(BusStatus::InProgress, BusStatus::Error).is_ok()
    }

    /// Foreground: `Finished | Error -> Idle`. Idle stays Idle.
    pub fn acknowledge(&self) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                if raw == BusStatus::InProgress as u8 {
                    None
                } else {
                    Some(BusStatus::Idle as u8)
                }
            })
            .is_ok()
    }

    fn transition(&self, from: BusStatus, to: BusStatus) -> Result<(), BusStatus> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|raw| BusStatus::try_from(raw).unwrap_or(BusStatus::Error))
    }
}

impl Default for StatusFlag {
    fn default() -> Self {
        Self::new()
    }
}
