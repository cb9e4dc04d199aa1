//! The hardware FIFO seen by the transaction engines.
//!
//! The engines never touch FIFO registers directly. They only look at fill
//! levels and move bytes one at a time through [`Fifo::push`] and [`Fifo::pop`].

/// Entries in the transmit and receive FIFO of a peripheral.
pub const FIFO_DEPTH: usize = 16;

/// Fixed-depth transmit/receive queue exposed by a bus peripheral.
pub trait Fifo {
    /// Number of entries of each queue.
    const DEPTH: usize = FIFO_DEPTH;

    /// Bytes waiting in the transmit queue.
    fn tx_level(&self) -> usize;

    /// Bytes waiting in the receive queue.
    fn rx_level(&self) -> usize;

    /// Queue one byte for transmission. Only called while `tx_free() > 0`.
    fn push(&mut self, byte: u8);

    /// Take the oldest received byte. Only called while `rx_level() > 0`.
    fn pop(&mut self) -> u8;

    #[inline]
    fn tx_free(&self) -> usize {
        Self::DEPTH.saturating_sub(self.tx_level())
    }
}
