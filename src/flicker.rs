//! Randomized Off/On/Flashing process for the "k" light.
//!
//! Updated once per second. From `Off` or `On` the light changes state on
//! average once every five hours; one in 24 of those changes starts flashing
//! instead of toggling. Flashing stops after 100 seconds on average and always
//! falls back to `Off`.

use crate::random::{RandomSource, randint};
use crate::types::{FlickerState, InvalidState};

/// Mean number of updates between changes while `Off` or `On`.
pub const CHANGE_ONE_IN: u32 = 5 * 60 * 60;

/// One in this many changes goes to `Flashing` instead of toggling.
pub const FLASH_ONE_IN: u32 = 24;

/// Mean number of updates spent `Flashing`.
pub const STOP_FLASHING_ONE_IN: u32 = 100;

/// The flicker light's state machine.
///
/// The state is kept in its raw byte encoding so a machine restored from
/// retained memory can be validated on its next update.
#[derive(Debug, Clone, Default)]
pub struct FlickerStateMachine {
    raw: u8,
}

impl FlickerStateMachine {
    /// Creates a machine in the `Off` state.
    pub fn new() -> Self {
        Self {
            raw: FlickerState::Off as u8,
        }
    }

    /// Restores a machine from its raw byte. Invalid bytes are caught on the next update.
    pub fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Current state. A corrupted byte reads as `Off` until the next update resets it.
    pub fn state(&self) -> FlickerState {
        FlickerState::try_from(self.raw).unwrap_or_default()
    }

    /// Runs one time step of the process.
    ///
    /// # Errors
    /// Returns [`InvalidState`] if the stored state was corrupted. The machine
    /// has been reset to `Off` by then.
    pub fn update<R: RandomSource>(&mut self, rng: &mut R) -> Result<FlickerState, InvalidState> {
        let next = match FlickerState::try_from(self.raw) {
            Ok(state @ (FlickerState::Off | FlickerState::On)) => {
                if randint(rng, 1, CHANGE_ONE_IN) <= 1 {
                    if randint(rng, 1, FLASH_ONE_IN) <= 1 {
                        FlickerState::Flashing
                    } else if state == FlickerState::Off {
                        FlickerState::On
                    } else {
                        FlickerState::Off
                    }
                } else {
                    state
                }
            }
            Ok(FlickerState::Flashing) => {
                if randint(rng, 1, STOP_FLASHING_ONE_IN) <= 1 {
                    FlickerState::Off
                } else {
                    FlickerState::Flashing
                }
            }
            Err(e) => {
                self.raw = FlickerState::Off as u8;
                return Err(e);
            }
        };
        self.raw = next as u8;
        Ok(next)
    }
}
