//! Non-blocking, interrupt-driven bus masters for peripherals with a hardware FIFO.
//!
//! Two engines share one transaction model:
//!
//! * [`TwoWire`] addresses a peer and writes, reads, or writes then reads after
//!   a repeated start, up to one FIFO worth of bytes per direction.
//! * [`FourWire`] exchanges a buffer larger than the FIFO with one of several
//!   selectable peers, refilling the FIFO from its interrupt handler.
//!
//! The foreground starts a transaction and polls [`Bus::status`]; the
//! peripheral's interrupt handler calls [`Bus::on_interrupt`] to move bytes and
//! detect completion. A finished or failed transaction stays visible until the
//! foreground calls [`Bus::acknowledge_idle`].
#![cfg_attr(not(test), no_std)]

pub mod bus;
mod cursor;
pub mod error;
pub mod fifo;
pub mod register;
pub mod request;
pub mod shared;
mod status;
pub mod timing;
pub mod watchdog;

#[cfg(test)]
mod mock;

pub use crate::bus::{Bus, FourWire, TwoWire};
pub use crate::error::{BusError, ConfigError, InitError, StartError, Timeout};
pub use crate::fifo::{Fifo, FIFO_DEPTH};
pub use crate::request::{Direction, Request};
pub use crate::shared::Shared;
pub use crate::status::BusStatus;
pub use crate::watchdog::Watchdog;
