use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, MODE_0};
use fugit::HertzU32;

use crate::bus::Bus;
use crate::cursor::TransferCursor;
use crate::error::{BusError, ConfigError, InitError, StartError};
use crate::fifo::Fifo;
use crate::status::{BusStatus, StatusFlag};
use crate::timing::FourWireTiming;

/// Default capacity of the transfer buffers.
pub const BUFFER_SIZE: usize = 50;

/// Register-level control of a four-wire controller in master mode.
pub trait Hardware: Fifo {
    /// Apply bit rate and clock mode. Called once with the controller held in reset.
    fn configure(&mut self, timing: &FourWireTiming);

    /// Raise the receive interrupt once this many bytes are waiting.
    fn set_rx_threshold(&mut self, level: usize);

    fn enable_rx_interrupt(&mut self);

    fn disable_rx_interrupt(&mut self);

    fn clear_rx_interrupt(&mut self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Clock feeding the controller's bit-rate divider.
    pub peripheral_clock: HertzU32,
    pub bit_rate: HertzU32,
    pub mode: Mode,
}

impl Config {
    pub fn timing(&self) -> Result<FourWireTiming, ConfigError> {
        FourWireTiming::new(self.peripheral_clock, self.bit_rate, self.mode)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            peripheral_clock: HertzU32::MHz(50),
            bit_rate: HertzU32::MHz(1),
            mode: MODE_0,
        }
    }
}

/// Interrupt-driven full-duplex master for `P` peers.
///
/// A transfer of up to `N` bytes is streamed through the hardware FIFO: the
/// receive interrupt fires once every byte in flight has been clocked back in,
/// the handler drains them and queues the next chunk. Each byte written yields
/// exactly one byte read.
///
/// Select lines are active low.
#[derive(Debug)]
pub struct FourWire<H, CS, const P: usize, const N: usize = BUFFER_SIZE> {
    hardware: H,
    peers: [CS; P],
    selected: Option<usize>,
    status: StatusFlag,
    cursor: TransferCursor,
    error: Option<BusError>,
    write_buffer: [u8; N],
    read_buffer: [u8; N],
}

impl<H: Hardware, CS: OutputPin, const P: usize, const N: usize> FourWire<H, CS, P, N> {
    pub fn new(
        mut hardware: H,
        mut peers: [CS; P],
        config: Config,
    ) -> Result<Self, InitError<CS::Error>> {
        let timing = config.timing()?;
        for peer in peers.iter_mut() {
            peer.set_high().map_err(InitError::PeerSelect)?;
        }
        hardware.disable_rx_interrupt();
        hardware.configure(&timing);

        #[cfg(feature = "defmt")]
        defmt::debug!("four-wire master configured: {}", timing);

        Ok(FourWire {
            hardware,
            peers,
            selected: None,
            status: StatusFlag::new(),
            cursor: TransferCursor::new(),
            error: None,
            write_buffer: [0; N],
            read_buffer: [0; N],
        })
    }

    /// Exchange the first `len` bytes of the write buffer with `peer`.
    pub fn start(&mut self, peer: usize, len: usize) -> Result<(), StartError<CS::Error>> {
        let status = self.status.load();
        if status != BusStatus::Idle {
            return Err(StartError::from_status(status));
        }
        if peer >= P {
            return Err(StartError::UnknownPeer);
        }
        if !(1..=N).contains(&len) {
            return Err(StartError::InvalidLength);
        }

        self.peers[peer].set_low().map_err(StartError::PeerSelect)?;
        if let Err(status) = self.status.begin() {
            self.peers[peer].set_high().ok();
            return Err(StartError::from_status(status));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("four-wire start: peer {}, {} bytes", peer, len);

        self.selected = Some(peer);
        self.error = None;
        self.cursor.reset(len, len);
        self.refill();
        self.hardware.enable_rx_interrupt();
        Ok(())
    }

    pub fn is_selected(&self, peer: usize) -> bool {
        self.selected == Some(peer)
    }

    /// Bytes sent by the next transfer. `None` while a transfer is in flight.
    pub fn write_buffer(&mut self) -> Option<&mut [u8; N]> {
        if self.status.load() == BusStatus::InProgress {
            None
        } else {
            Some(&mut self.write_buffer)
        }
    }

    /// Bytes clocked in by the last transfer, only while it is `Finished`.
    pub fn read_buffer(&self) -> Option<&[u8]> {
        if self.status.load() == BusStatus::Finished {
            self.read_buffer.get(..self.cursor.next_read())
        } else {
            None
        }
    }

    pub fn clear_buffers(&mut self) -> bool {
        if self.status.load() == BusStatus::InProgress {
            return false;
        }
        self.write_buffer = [0; N];
        self.read_buffer = [0; N];
        true
    }

    pub fn release(mut self) -> (H, [CS; P]) {
        self.hardware.disable_rx_interrupt();
        (self.hardware, self.peers)
    }

    /// Queue as many bytes as fit without exceeding one FIFO of unread
    /// responses, and wait for all of them to come back.
    fn refill(&mut self) {
        let room = H::DEPTH.saturating_sub(self.cursor.in_flight());
        self.cursor
            .fill(&mut self.hardware, &self.write_buffer, room);
        self.hardware.set_rx_threshold(self.cursor.in_flight());
    }

    fn complete(&mut self) {
        self.hardware.disable_rx_interrupt();

        let released = match self.selected.take() {
            Some(peer) => self.peers[peer].set_high().is_ok(),
            None => true,
        };

        if released {
            if self.status.finish() {
                #[cfg(feature = "defmt")]
                defmt::debug!("four-wire transfer finished");
            }
        } else if self.status.fail() {
            self.error = Some(BusError::PeerRelease);

            #[cfg(feature = "defmt")]
            defmt::warn!("four-wire peer select could not be released");
        }
    }
}

impl<H: Hardware, CS: OutputPin, const P: usize, const N: usize> Bus for FourWire<H, CS, P, N> {
    fn status(&self) -> BusStatus {
        self.status.load()
    }

    fn acknowledge_idle(&self) -> bool {
        self.status.acknowledge()
    }

    fn on_interrupt(&mut self) {
        if self.status.load() == BusStatus::InProgress {
            self.cursor.drain(&mut self.hardware, &mut self.read_buffer);

            if self.cursor.remaining() == 0 {
                self.complete();
            } else {
                self.refill();
            }
        }

        self.hardware.clear_rx_interrupt();
    }

    fn error(&self) -> Option<BusError> {
        if self.status.load() == BusStatus::Error {
            self.error
        } else {
            None
        }
    }
}
