//! Hardware abstraction traits for the collaborators around the engine.
//!
//! The engine never touches registers. Implement these traits for your board's
//! GPIO, non-volatile storage and debug UART.

use crate::types::LightStates;

/// Value returned by [`PersistenceStore::read`] when no backup has been written.
pub const NO_BACKUP: u32 = 0xFFFF_FFFF;

/// Trait for abstracting the light bank output.
pub trait LightBank {
    /// Drives all lights at once.
    ///
    /// Implementations should update every output in one go so the bank never
    /// shows a half-written vector. Handle any hardware errors internally -
    /// this method cannot fail.
    fn write(&mut self, lights: &LightStates);

    /// Drives the indicator that shows the clock-edit mode is active.
    ///
    /// Boards without such an indicator can keep the default no-op.
    fn set_edit_indicator(&mut self, _on: bool) {}
}

/// A single digital input, such as the control button or the canteen switch.
pub trait DigitalInput {
    /// Returns true while the input is asserted.
    fn read(&mut self) -> bool;
}

/// Non-volatile storage for the daily clock backup.
///
/// Reads and writes are treated as infallible. A store that cannot deliver a
/// backup returns [`NO_BACKUP`].
pub trait PersistenceStore {
    /// Reads the stored UTC timestamp (seconds since the Unix epoch).
    fn read(&mut self) -> u32;

    /// Stores a UTC timestamp (seconds since the Unix epoch).
    fn write(&mut self, timestamp: u32);
}

/// Best-effort text log, typically a serial port.
pub trait DebugSink {
    /// Writes one line of text. Must not block for long; dropping output is fine.
    fn write_str(&mut self, text: &str);
}

/// A [`DebugSink`] that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDebug;

impl DebugSink for NullDebug {
    fn write_str(&mut self, _text: &str) {}
}
