use core::cell::RefCell;

use critical_section::Mutex;

use crate::bus::Bus;

/// A bus that is driven from both the foreground and its interrupt handler.
///
/// Meant to live in a `static`:
///
/// ```ignore
/// static BUS: Shared<TwoWire<Controller>> = Shared::new();
///
/// #[interrupt]
/// fn I2CA() {
///     BUS.on_interrupt();
/// }
/// ```
pub struct Shared<B>(Mutex<RefCell<Option<B>>>);

impl<B> Shared<B> {
    pub const fn new() -> Self {
        Shared(Mutex::new(RefCell::new(None)))
    }

    /// Hand the bus over, returning the one installed before, if any.
    pub fn install(&self, bus: B) -> Option<B> {
        critical_section::with(|cs| self.0.borrow_ref_mut(cs).replace(bus))
    }

    pub fn take(&self) -> Option<B> {
        critical_section::with(|cs| self.0.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the installed bus with interrupts masked. `None` if nothing
    /// is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        critical_section::with(|cs| self.0.borrow_ref_mut(cs).as_mut().map(f))
    }
}

impl<B: Bus> Shared<B> {
    /// Interrupt handler entry point.
    pub fn on_interrupt(&self) {
        self.with(B::on_interrupt);
    }
}

impl<B> Default for Shared<B> {
    fn default() -> Self {
        Self::new()
    }
}
