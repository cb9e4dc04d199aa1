//! Simulated peripherals for host tests.

use std::collections::VecDeque;

use embedded_hal::digital::{self, ErrorType, OutputPin};
use embedded_hal::i2c::SevenBitAddress;

use crate::bus::{four_wire, two_wire};
use crate::fifo::{Fifo, FIFO_DEPTH};
use crate::register::{two_wire::*, Events};
use crate::timing::{FourWireTiming, TwoWireTiming};

/// Full-duplex FIFO pair: every byte shifted out clocks one byte in.
///
/// The peer answers with the scripted response bytes, or echoes once the
/// script is exhausted.
#[derive(Debug, Default)]
pub struct Loopback {
    tx: VecDeque<u8>,
    rx: VecDeque<u8>,
    received: Vec<u8>,
    responses: VecDeque<u8>,
    fill_rounds: usize,
    pushing: bool,
}

impl Loopback {
    pub fn respond_with(responses: &[u8]) -> Self {
        Loopback {
            responses: responses.iter().copied().collect(),
            ..Loopback::default()
        }
    }

    /// Clock every queued byte out to the peer.
    pub fn shift(&mut self) {
        self.pushing = false;
        while let Some(byte) = self.tx.pop_front() {
            self.received.push(byte);
            let answer = self.responses.pop_front().unwrap_or(byte);
            self.rx.push_back(answer);
            assert!(self.rx.len() <= FIFO_DEPTH, "receive FIFO overflow");
        }
    }

    pub fn peer_received(&self) -> &[u8] {
        &self.received
    }

    /// Number of uninterrupted runs of pushes.
    pub fn fill_rounds(&self) -> usize {
        self.fill_rounds
    }
}

impl Fifo for Loopback {
    fn tx_level(&self) -> usize {
        self.tx.len()
    }

    fn rx_level(&self) -> usize {
        self.rx.len()
    }

    fn push(&mut self, byte: u8) {
        assert!(self.tx.len() < FIFO_DEPTH, "transmit FIFO overflow");
        if !self.pushing {
            self.pushing = true;
            self.fill_rounds += 1;
        }
        self.tx.push_back(byte);
    }

    fn pop(&mut self) -> u8 {
        self.pushing = false;
        self.rx.pop_front().expect("receive FIFO underflow")
    }
}

/// Four-wire controller around a [`Loopback`].
#[derive(Debug, Default)]
pub struct FourWireSim {
    pub fifo: Loopback,
    pub timing: Option<FourWireTiming>,
    pub threshold: usize,
    pub rx_interrupt: bool,
    pub cleared: usize,
}

impl FourWireSim {
    pub fn respond_with(responses: &[u8]) -> Self {
        FourWireSim {
            fifo: Loopback::respond_with(responses),
            ..FourWireSim::default()
        }
    }

    pub fn clock(&mut self) {
        self.fifo.shift();
    }

    pub fn interrupt_pending(&self) -> bool {
        self.rx_interrupt && self.threshold > 0 && self.fifo.rx_level() >= self.threshold
    }
}

impl Fifo for FourWireSim {
    fn tx_level(&self) -> usize {
        self.fifo.tx_level()
    }

    fn rx_level(&self) -> usize {
        self.fifo.rx_level()
    }

    fn push(&mut self, byte: u8) {
        self.fifo.push(byte)
    }

    fn pop(&mut self) -> u8 {
        self.fifo.pop()
    }
}

impl four_wire::Hardware for FourWireSim {
    fn configure(&mut self, timing: &FourWireTiming) {
        self.timing = Some(*timing);
    }

    fn set_rx_threshold(&mut self, level: usize) {
        assert!(level <= FIFO_DEPTH);
        self.threshold = level;
    }

    fn enable_rx_interrupt(&mut self) {
        self.rx_interrupt = true;
    }

    fn disable_rx_interrupt(&mut self) {
        self.rx_interrupt = false;
    }

    fn clear_rx_interrupt(&mut self) {
        self.cleared += 1;
    }
}

/// Two-wire controller with separate transmit and receive queues of `D` entries.
#[derive(Debug, Default)]
pub struct TwoWireController<const D: usize> {
    pub timing: Option<TwoWireTiming>,
    pub tx: VecDeque<u8>,
    pub rx: VecDeque<u8>,
    pub transmitted: Vec<u8>,
    pub flags: Events,
    pub enabled: Events,
    pub busy: bool,
    pub stop_pending: bool,
    pub mode: Option<two_wire::Mode>,
    pub address: Option<SevenBitAddress>,
    pub byte_count: u16,
    pub starts: usize,
    pub stops: usize,
}

pub type TwoWireSim = TwoWireController<FIFO_DEPTH>;

/// A controller with a quarter of the usual queue depth.
pub type ShallowTwoWireSim = TwoWireController<4>;

impl<const D: usize> TwoWireController<D> {
    /// The peer took every queued byte; the byte counter has not run out yet.
    pub fn shift_out(&mut self) {
        self.transmitted.extend(self.tx.drain(..));
        self.flags = self.flags.with(TX_FIFO);
    }

    /// The peer took every queued byte; the byte counter ran out.
    pub fn complete_write(&mut self) {
        self.transmitted.extend(self.tx.drain(..));
        if self.stop_pending {
            self.complete_stop();
        } else {
            self.flags = self.flags.with(ACCESS_READY);
        }
    }

    /// The peer did not acknowledge the address byte.
    pub fn nack(&mut self) {
        self.tx.clear();
        self.flags = self.flags.with(NO_ACK).with(ACCESS_READY);
    }

    pub fn receive(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
        assert!(self.rx.len() <= D, "receive FIFO overflow");
        self.flags = self.flags.with(RX_FIFO);
    }

    pub fn complete_stop(&mut self) {
        self.stop_pending = false;
        self.busy = false;
        self.flags = self.flags.with(STOP_DETECTED);
    }
}

impl<const D: usize> Fifo for TwoWireController<D> {
    const DEPTH: usize = D;

    fn tx_level(&self) -> usize {
        self.tx.len()
    }

    fn rx_level(&self) -> usize {
        self.rx.len()
    }

    fn push(&mut self, byte: u8) {
        assert!(self.tx.len() < D, "transmit FIFO overflow");
        self.tx.push_back(byte);
    }

    fn pop(&mut self) -> u8 {
        self.rx.pop_front().expect("receive FIFO underflow")
    }
}

impl<const D: usize> two_wire::Hardware for TwoWireController<D> {
    fn configure(&mut self, timing: &TwoWireTiming) {
        self.timing = Some(*timing);
    }

    fn is_bus_busy(&self) -> bool {
        self.busy
    }

    fn is_stop_pending(&self) -> bool {
        self.stop_pending
    }

    fn set_mode(&mut self, mode: two_wire::Mode) {
        self.mode = Some(mode);
    }

    fn set_address(&mut self, address: SevenBitAddress) {
        self.address = Some(address);
    }

    fn set_byte_count(&mut self, count: u16) {
        self.byte_count = count;
    }

    fn start(&mut self) {
        self.starts += 1;
        self.busy = true;
    }

    fn stop(&mut self) {
        self.stops += 1;
        self.stop_pending = true;
    }

    fn events(&self) -> Events {
        self.flags
    }

    fn clear_events(&mut self, events: Events) {
        self.flags = self.flags.without(events);
    }

    fn enable_events(&mut self, events: Events) {
        self.enabled = self.enabled.union(events);
    }

    fn disable_events(&mut self, events: Events) {
        self.enabled = self.enabled.without(events);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Select line whose driver can be made to fail.
#[derive(Debug, Default)]
pub struct FaultyPin {
    pub high: bool,
    pub fail_high: bool,
    pub fail_low: bool,
}

impl ErrorType for FaultyPin {
    type Error = PinFault;
}

impl OutputPin for FaultyPin {
    fn set_low(&mut self) -> Result<(), PinFault> {
        if self.fail_low {
            return Err(PinFault);
        }
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        if self.fail_high {
            return Err(PinFault);
        }
        self.high = true;
        Ok(())
    }
}
