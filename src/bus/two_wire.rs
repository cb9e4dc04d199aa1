use embedded_hal::i2c::SevenBitAddress;
use fugit::HertzU32;

use crate::bus::Bus;
use crate::cursor::TransferCursor;
use crate::error::{BusError, ConfigError, StartError};
use crate::fifo::{Fifo, FIFO_DEPTH};
use crate::register::{two_wire::*, Events};
use crate::request::{Direction, Request};
use crate::status::{BusStatus, StatusFlag};
use crate::timing::{Frequency, TwoWireTiming};

/// Direction the controller shifts data in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Master transmitter.
    Transmit,
    /// Master receiver.
    Receive,
}

/// Register-level control of a two-wire controller in master mode.
///
/// Implementations map each call onto the controller's mode, address, count and
/// interrupt registers. None of the calls may block.
pub trait Hardware: Fifo {
    /// Apply clock dividers. Called once with the controller held in reset.
    fn configure(&mut self, timing: &TwoWireTiming);

    /// Another transfer is still occupying the bus.
    fn is_bus_busy(&self) -> bool;

    /// A stop condition was requested and has not finished on the bus.
    fn is_stop_pending(&self) -> bool;

    fn set_mode(&mut self, mode: Mode);

    fn set_address(&mut self, address: SevenBitAddress);

    /// Number of data bytes of the next (repeated) start, address excluded.
    fn set_byte_count(&mut self, count: u16);

    /// Issue a start, or a repeated start while the bus is held.
    fn start(&mut self);

    /// Schedule a stop condition after the byte counter runs out.
    fn stop(&mut self);

    /// Pending events.
    fn events(&self) -> Events;

    fn clear_events(&mut self, events: Events);

    fn enable_events(&mut self, events: Events);

    fn disable_events(&mut self, events: Events);
}

/// Bus clock settings.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub system_clock: HertzU32,
    pub frequency: Frequency,
}

impl Config {
    pub fn timing(&self) -> Result<TwoWireTiming, ConfigError> {
        TwoWireTiming::new(self.system_clock, self.frequency)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            system_clock: HertzU32::MHz(200),
            frequency: Frequency::default(),
        }
    }
}

/// Events enabled only for the duration of a transaction.
fn transfer_events() -> Events {
    Events::empty()
        .with(ACCESS_READY)
        .with(RX_FIFO)
        .with(TX_FIFO)
}

/// Interrupt-driven two-wire master.
///
/// Transfers of up to [`FIFO_DEPTH`] bytes per direction. The caller stages
/// outgoing bytes in [`write_buffer`](TwoWire::write_buffer), starts a
/// transaction, and collects incoming bytes from
/// [`read_buffer`](TwoWire::read_buffer) once the bus reports
/// [`BusStatus::Finished`].
#[derive(Debug)]
pub struct TwoWire<H> {
    hardware: H,
    status: StatusFlag,
    phase: Option<Mode>,
    cursor: TransferCursor,
    pending_read: Option<usize>,
    error: Option<BusError>,
    write_buffer: [u8; FIFO_DEPTH],
    read_buffer: [u8; FIFO_DEPTH],
}

impl<H: Hardware> TwoWire<H> {
    pub fn new(mut hardware: H, config: Config) -> Result<Self, ConfigError> {
        let timing = config.timing()?;
        hardware.configure(&timing);
        hardware.disable_events(transfer_events());
        hardware.enable_events(Events::empty().with(STOP_DETECTED).with(NO_ACK));

        #[cfg(feature = "defmt")]
        defmt::debug!("two-wire master configured: {}", timing);

        Ok(TwoWire {
            hardware,
            status: StatusFlag::new(),
            phase: None,
            cursor: TransferCursor::new(),
            pending_read: None,
            error: None,
            write_buffer: [0; FIFO_DEPTH],
            read_buffer: [0; FIFO_DEPTH],
        })
    }

    /// Send the first `len` bytes of the write buffer, then stop.
    pub fn write(&mut self, address: SevenBitAddress, len: usize) -> Result<(), StartError> {
        self.start(Request::write(address, len))
    }

    /// Receive `len` bytes into the read buffer, then stop.
    pub fn read(&mut self, address: SevenBitAddress, len: usize) -> Result<(), StartError> {
        self.start(Request::read(address, len))
    }

    /// Send `write_len` bytes, then receive `read_len` bytes after a repeated start.
    pub fn write_read(
        &mut self,
        address: SevenBitAddress,
        write_len: usize,
        read_len: usize,
    ) -> Result<(), StartError> {
        self.start(Request::write_read(address, write_len, read_len))
    }

    /// Start a transaction. A rejected request changes nothing.
    pub fn start(&mut self, request: Request) -> Result<(), StartError> {
        let status = self.status.load();
        if status != BusStatus::Idle {
            return Err(StartError::from_status(status));
        }
        if self.hardware.is_bus_busy() || self.hardware.is_stop_pending() {
            return Err(StartError::BusNotIdle);
        }
        request.validate(FIFO_DEPTH)?;
        self.status.begin().map_err(StartError::from_status)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("two-wire start: {}", request);

        self.error = None;
        self.pending_read = None;
        self.hardware.set_address(request.address);

        match request.direction {
            Direction::Read => {
                self.cursor.reset(0, request.read_len);
                self.phase = Some(Mode::Receive);
                self.hardware.set_mode(Mode::Receive);
                self.hardware.set_byte_count(request.read_len as u16);
                self.hardware.enable_events(Events::empty().with(RX_FIFO));
                self.hardware.start();
                self.hardware.stop();
            }
            Direction::Write | Direction::WriteThenRead => {
                self.cursor.reset(request.write_len, 0);
                self.phase = Some(Mode::Transmit);
                self.hardware.set_mode(Mode::Transmit);
                self.cursor
                    .fill(&mut self.hardware, &self.write_buffer, usize::MAX);
                if self.cursor.unsent() > 0 {
                    // the rest is queued from the transmit FIFO interrupt
                    self.hardware.enable_events(Events::empty().with(TX_FIFO));
                }
                self.hardware.set_byte_count(request.write_len as u16);

                if request.direction == Direction::WriteThenRead {
                    self.pending_read = Some(request.read_len);
                    self.hardware
                        .enable_events(Events::empty().with(ACCESS_READY));
                    self.hardware.start();
                } else {
                    self.hardware.start();
                    self.hardware.stop();
                }
            }
        }

        Ok(())
    }

    /// Bytes sent by the next write. `None` while a transaction is in flight.
    pub fn write_buffer(&mut self) -> Option<&mut [u8; FIFO_DEPTH]> {
        if self.status.load() == BusStatus::InProgress {
            None
        } else {
            Some(&mut self.write_buffer)
        }
    }

    /// Bytes received by the last transaction, only while it is `Finished`.
    pub fn read_buffer(&self) -> Option<&[u8]> {
        if self.status() == BusStatus::Finished {
            self.read_buffer.get(..self.cursor.next_read())
        } else {
            None
        }
    }

    /// Zero both buffers. Refused while a transaction is in flight.
    pub fn clear_buffers(&mut self) -> bool {
        if self.status.load() == BusStatus::InProgress {
            return false;
        }
        self.write_buffer = [0; FIFO_DEPTH];
        self.read_buffer = [0; FIFO_DEPTH];
        true
    }

    #[cfg(test)]
    pub(crate) fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn release(mut self) -> H {
        self.hardware.disable_events(transfer_events());
        self.hardware
    }

    fn on_no_ack(&mut self) {
        if self.status.fail() {
            self.error = Some(BusError::NoAcknowledge);

            #[cfg(feature = "defmt")]
            defmt::debug!("two-wire peer did not acknowledge");
        }

        self.pending_read = None;
        self.hardware.disable_events(transfer_events());
        if !self.hardware.is_stop_pending() {
            self.hardware.stop();
        }
    }

    /// Write phase of a write-then-read is done; turn the bus around.
    fn on_access_ready(&mut self) {
        if self.status.load() != BusStatus::InProgress {
            return;
        }
        let Some(read_len) = self.pending_read.take() else {
            return;
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("two-wire repeated start, reading {} bytes", read_len);

        self.hardware
            .disable_events(Events::empty().with(ACCESS_READY));
        self.cursor.begin_read_phase(read_len);
        self.phase = Some(Mode::Receive);
        self.hardware.set_mode(Mode::Receive);
        self.hardware.set_byte_count(read_len as u16);
        self.hardware.enable_events(Events::empty().with(RX_FIFO));
        self.hardware.start();
        self.hardware.stop();
    }

    fn service_fifo(&mut self) {
        match self.phase {
            Some(Mode::Receive) => {
                self.cursor.drain(&mut self.hardware, &mut self.read_buffer);
            }
            Some(Mode::Transmit) => {
                self.cursor
                    .fill(&mut self.hardware, &self.write_buffer, usize::MAX);
                if self.cursor.unsent() == 0 {
                    self.hardware.disable_events(Events::empty().with(TX_FIFO));
                }
            }
            None => {}
        }
    }

    fn on_stop_detected(&mut self) {
        self.hardware.disable_events(transfer_events());
        self.phase = None;
        self.pending_read = None;

        if self.status.finish() {
            #[cfg(feature = "defmt")]
            defmt::debug!("two-wire transaction finished");
        }
    }
}

impl<H: Hardware> Bus for TwoWire<H> {
    /// `InProgress` until a requested stop condition has completed on the bus,
    /// regardless of the transaction outcome.
    fn status(&self) -> BusStatus {
        if self.hardware.is_stop_pending() {
            BusStatus::InProgress
        } else {
            self.status.load()
        }
    }

    fn acknowledge_idle(&self) -> bool {
        self.status.acknowledge()
    }

    fn on_interrupt(&mut self) {
        let events = self.hardware.events();
        self.hardware.clear_events(events);

        if self.phase.is_none() {
            return;
        }

        let nack = events.contains(NO_ACK);
        if nack {
            self.on_no_ack();
        }
        if events.contains(ACCESS_READY) && !nack {
            self.on_access_ready();
        }
        // a latched error leaves the buffers alone
        if !nack && self.status.load() == BusStatus::InProgress {
            self.service_fifo();
        }
        if events.contains(STOP_DETECTED) {
            self.on_stop_detected();
        }
    }

    fn error(&self) -> Option<BusError> {
        if self.status.load() == BusStatus::Error {
            self.error
        } else {
            None
        }
    }
}
