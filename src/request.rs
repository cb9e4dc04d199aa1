use embedded_hal::i2c::SevenBitAddress;

use crate::error::StartError;

/// Highest address representable in seven-bit addressing mode.
const MAX_SEVEN_BIT_ADDRESS: SevenBitAddress = 0x7F;

/// Transfer direction(s) of a two-wire transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Master transmitter; stop after the last byte.
    Write,
    /// Master receiver; stop after the last byte.
    Read,
    /// Transmit, then a repeated start and receive from the same peer.
    WriteThenRead,
}

/// Description of a two-wire transaction.
///
/// The payload itself lives in the engine's buffers; a request only carries
/// the peer and how many bytes of each buffer take part.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Request {
    pub address: SevenBitAddress,
    pub direction: Direction,
    pub write_len: usize,
    pub read_len: usize,
}

impl Request {
    pub const fn write(address: SevenBitAddress, write_len: usize) -> Self {
        Request {
            address,
            direction: Direction::Write,
            write_len,
            read_len: 0,
        }
    }

    pub const fn read(address: SevenBitAddress, read_len: usize) -> Self {
        Request {
            address,
            direction: Direction::Read,
            write_len: 0,
            read_len,
        }
    }

    pub const fn write_read(address: SevenBitAddress, write_len: usize, read_len: usize) -> Self {
        Request {
            address,
            direction: Direction::WriteThenRead,
            write_len,
            read_len,
        }
    }

    /// Check the request against a buffer capacity without touching any state.
    ///
    /// Every length the direction uses must be in `1..=capacity`; lengths the
    /// direction does not use are ignored.
    pub fn validate(&self, capacity: usize) -> Result<(), StartError> {
        if self.address > MAX_SEVEN_BIT_ADDRESS {
            return Err(StartError::InvalidAddress);
        }

        let in_range = |len: usize| (1..=capacity).contains(&len);
        let lengths_ok = match self.direction {
            Direction::Write => in_range(self.write_len),
            Direction::Read => in_range(self.read_len),
            Direction::WriteThenRead => in_range(self.write_len) && in_range(self.read_len),
        };

        if lengths_ok {
            Ok(())
        } else {
            Err(StartError::InvalidLength)
        }
    }
}
