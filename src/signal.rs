//! Signals posted from interrupt handlers and drained by the poll loop.
//!
//! Interrupt handlers do nothing but post: the timer ISR calls
//! [`TickSignal::post`] and the button's edge ISR calls [`EdgeSignal::post`].
//! Every read-modify-write happens inside a critical section, so the poll loop
//! never observes a torn update.
//!
//! ```ignore
//! static SIGNALS: Signals = Signals::new();
//!
//! #[interrupt]
//! fn TIMER2_OVF() {
//!     SIGNALS.ticks.post();
//! }
//! ```

use core::cell::Cell;
use critical_section::Mutex;

/// Counts timer ticks that the poll loop has not consumed yet.
pub struct TickSignal {
    pending: Mutex<Cell<u32>>,
}

impl TickSignal {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Records one tick. Call from the timer interrupt.
    pub fn post(&self) {
        critical_section::with(|cs| {
            let pending = self.pending.borrow(cs);
            pending.set(pending.get().saturating_add(1));
        });
    }

    /// Returns the number of ticks posted since the last call and clears it.
    pub fn take(&self) -> u32 {
        critical_section::with(|cs| self.pending.borrow(cs).replace(0))
    }

    /// Returns the pending tick count without consuming it.
    pub fn pending(&self) -> u32 {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Latches a rising edge on the control button.
pub struct EdgeSignal {
    pending: Mutex<Cell<bool>>,
}

impl EdgeSignal {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(false)),
        }
    }

    /// Records a rising edge. Call from the pin-change interrupt.
    pub fn post(&self) {
        critical_section::with(|cs| self.pending.borrow(cs).set(true));
    }

    /// Returns true if an edge was posted since the last call, clearing the latch.
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).replace(false))
    }
}

impl Default for EdgeSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Both interrupt signals, meant to live in a `static`.
pub struct Signals {
    pub ticks: TickSignal,
    pub button_edge: EdgeSignal,
}

impl Signals {
    pub const fn new() -> Self {
        Self {
            ticks: TickSignal::new(),
            button_edge: EdgeSignal::new(),
        }
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}
