//! Clock divider math for the two bus controllers.
//!
//! Both controllers are clocked from a peripheral clock that is divided down to
//! the bus clock. The functions here turn the requested rates into register
//! values and reject combinations the dividers cannot express.

use embedded_hal::spi::{Mode, MODE_0};
use fugit::HertzU32;

use crate::error::ConfigError;

/// Internal clock the two-wire controller is run at after the prescaler.
pub const TWO_WIRE_MODULE_CLOCK: HertzU32 = HertzU32::MHz(10);

/// Largest value of the two-wire prescaler register.
const MAX_PRESCALER: u32 = 0xFF;

/// Valid range of the four-wire bit-rate register.
const BIT_RATE_DIVIDER: core::ops::RangeInclusive<u32> = 3..=127;

/// Two-wire bus clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frequency {
    /// Standard mode.
    #[default]
    _100k,
    /// Fast mode.
    _400k,
}

impl Frequency {
    pub const fn rate(self) -> HertzU32 {
        match self {
            Frequency::_100k => HertzU32::kHz(100),
            Frequency::_400k => HertzU32::kHz(400),
        }
    }

    /// SCL high and low periods in module clock cycles.
    ///
    /// The controller adds a fixed delay to each half period that the data
    /// sheet formula does not capture, so the values were measured on hardware.
    const fn clock_periods(self) -> (u16, u16) {
        match self {
            Frequency::_100k => (42, 42),
            Frequency::_400k => (5, 4),
        }
    }
}

/// Register values of the two-wire controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwoWireTiming {
    /// Divides the system clock down to [`TWO_WIRE_MODULE_CLOCK`] (divider is `prescaler + 1`).
    pub prescaler: u8,
    pub clock_high: u16,
    pub clock_low: u16,
}

impl TwoWireTiming {
    pub fn new(system_clock: HertzU32, frequency: Frequency) -> Result<Self, ConfigError> {
        let divider = system_clock.to_Hz() / TWO_WIRE_MODULE_CLOCK.to_Hz();
        if divider == 0 {
            return Err(ConfigError::ClockTooSlow);
        }
        let prescaler = divider - 1;
        if prescaler > MAX_PRESCALER {
            return Err(ConfigError::DividerOutOfRange);
        }

        let (clock_high, clock_low) = frequency.clock_periods();
        Ok(TwoWireTiming {
            prescaler: prescaler as u8,
            clock_high,
            clock_low,
        })
    }
}

/// Register values of the four-wire controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FourWireTiming {
    /// Bit clock is `peripheral clock / (bit_rate_divider + 1)`.
    pub bit_rate_divider: u8,
    pub mode: Mode,
}

impl FourWireTiming {
    pub fn new(peripheral_clock: HertzU32, bit_rate: HertzU32, mode: Mode) -> Result<Self, ConfigError> {
        if bit_rate.to_Hz() == 0 || peripheral_clock < bit_rate {
            return Err(ConfigError::ClockTooSlow);
        }
        let divider = peripheral_clock.to_Hz() / bit_rate.to_Hz() - 1;
        if !BIT_RATE_DIVIDER.contains(&divider) {
            return Err(ConfigError::DividerOutOfRange);
        }

        Ok(FourWireTiming {
            bit_rate_divider: divider as u8,
            mode,
        })
    }
}

impl Default for FourWireTiming {
    /// 1 MHz in mode 0 from a 50 MHz peripheral clock.
    fn default() -> Self {
        FourWireTiming {
            bit_rate_divider: 49,
            mode: MODE_0,
        }
    }
}
