//! Interrupt/status bits of the two-wire controller.
//!
//! Bit positions follow the controller's status register; an implementation of
//! [`two_wire::Hardware`](crate::bus::two_wire::Hardware) can pass the raw
//! register value straight through [`Events::from_bits`].

use bit_field::BitField;

pub mod two_wire {
    /// A peer answered with a negative acknowledgement.
    pub const NO_ACK: usize = 1;
    /// The byte counter reached zero and no stop condition was requested.
    pub const ACCESS_READY: usize = 2;
    /// A stop condition has been detected on the bus.
    pub const STOP_DETECTED: usize = 5;
    /// The receive FIFO reached its threshold.
    pub const RX_FIFO: usize = 8;
    /// The transmit FIFO dropped to its threshold.
    pub const TX_FIFO: usize = 9;
}

/// A set of controller events, one bit per source.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Events(u16);

impl Events {
    pub const fn empty() -> Self {
        Events(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Events(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The set containing `self` plus the event at bit `event`.
    pub fn with(mut self, event: usize) -> Self {
        self.0.set_bit(event, true);
        self
    }

    /// The set containing `self` minus the events in `other`.
    pub fn without(self, other: Events) -> Self {
        Events(self.0 & !other.0)
    }

    pub fn union(self, other: Events) -> Self {
        Events(self.0 | other.0)
    }

    pub fn contains(self, event: usize) -> bool {
        self.0.get_bit(event)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
