use crate::fifo::Fifo;

/// Progress of the transaction an engine is currently driving.
///
/// `next_write` indexes the next byte of the write buffer that has not been
/// handed to the transmit FIFO, `next_read` the next free slot of the read
/// buffer. Both only ever move forward, so byte `0` always goes out (and comes
/// in) first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct TransferCursor {
    next_write: usize,
    next_read: usize,
    write_len: usize,
    read_len: usize,
}

impl TransferCursor {
    pub const fn new() -> Self {
        TransferCursor {
            next_write: 0,
            next_read: 0,
            write_len: 0,
            read_len: 0,
        }
    }

    /// Rewind for a new transaction.
    pub fn reset(&mut self, write_len: usize, read_len: usize) {
        *self = TransferCursor {
            write_len,
            read_len,
            ..TransferCursor::new()
        };
    }

    /// Arm the receive side for a read phase chained after the write phase.
    pub fn begin_read_phase(&mut self, read_len: usize) {
        self.next_read = 0;
        self.read_len = read_len;
    }

    #[inline]
    pub fn next_write(&self) -> usize {
        self.next_write
    }

    #[inline]
    pub fn next_read(&self) -> usize {
        self.next_read
    }

    #[inline]
    pub fn unsent(&self) -> usize {
        self.write_len.saturating_sub(self.next_write)
    }

    #[inline]
    pub fn unreceived(&self) -> usize {
        self.read_len.saturating_sub(self.next_read)
    }

    /// Bytes still to be handed to or collected from the FIFOs.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.unsent() + self.unreceived()
    }

    /// Bytes pushed for transmission whose echo has not been drained yet.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.next_write.saturating_sub(self.next_read)
    }

    /// Push up to `budget` bytes of `source` into the transmit FIFO, bounded by
    /// its free space. Returns the number of bytes pushed.
    pub fn fill<F: Fifo>(&mut self, fifo: &mut F, source: &[u8], budget: usize) -> usize {
        let mut pushed = 0;
        while pushed < budget && self.unsent() > 0 && fifo.tx_free() > 0 {
            let Some(&byte) = source.get(self.next_write) else {
                break;
            };
            fifo.push(byte);
            self.next_write += 1;
            pushed += 1;
        }
        pushed
    }

    /// Move received bytes from the FIFO into `dest`, never past the expected
    /// read length. Returns the number of bytes drained.
    pub fn drain<F: Fifo>(&mut self, fifo: &mut F, dest: &mut [u8]) -> usize {
        let mut popped = 0;
        while self.unreceived() > 0 && fifo.rx_level() > 0 {
            let Some(slot) = dest.get_mut(self.next_read) else {
                break;
            };
            *slot = fifo.pop();
            self.next_read += 1;
            popped += 1;
        }
        popped
    }
}
