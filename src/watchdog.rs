use fugit::MillisDurationU32;

use crate::error::Timeout;
use crate::status::BusStatus;

/// Puts a time bound on transactions from a periodic timer tick.
///
/// The bus engines wait for the peer indefinitely. Feed the bus status to
/// [`Watchdog::tick`] from the timer interrupt; once a single transaction has
/// stayed `InProgress` for longer than the timeout every further tick reports
/// [`Timeout`] until the status changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Watchdog {
    budget: u32,
    elapsed: u32,
}

impl Watchdog {
    /// `timeout` is rounded up to whole ticks of `period`.
    pub fn new(timeout: MillisDurationU32, period: MillisDurationU32) -> Self {
        let period = period.ticks().max(1);
        Watchdog {
            budget: timeout.ticks().div_ceil(period),
            elapsed: 0,
        }
    }

    pub fn tick(&mut self, status: BusStatus) -> Result<(), Timeout> {
        if status != BusStatus::InProgress {
            self.elapsed = 0;
            return Ok(());
        }

        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed > self.budget {
            #[cfg(feature = "defmt")]
            defmt::warn!("bus transaction timed out after {} ticks", self.elapsed);

            Err(Timeout)
        } else {
            Ok(())
        }
    }

    /// Elapsed time of the current transaction in ticks.
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
