#![cfg_attr(not(feature = "std"), no_std)]

//! Time keeping and light scheduling for a ten-light class-schedule indicator.
//!
//! # Core Concepts
//!
//! - **`TimeBase`**: Wall clock advanced by a hardware timer tick, with EU daylight saving and a daily backup
//! - **`Schedule`**: One `LightRule` per light; evaluates to the `LightStates` vector for a cycle
//! - **`FlickerStateMachine`**: Randomized Off/On/Flashing process for the "k" light
//! - **`ButtonController`**: Long/short press classification for the control button
//! - **`ControlStateMachine`**: Clock-edit mode with a binary read-out of the selected field
//! - **`LightController`**: The poll loop composing all of the above
//! - **`LightBank`**, **`DigitalInput`**, **`PersistenceStore`**, **`DebugSink`**: Traits to implement for your board
//! - **`Signals`**: What the interrupt handlers post to
//!
//! All light output is a pure function of local time, the flicker state, the
//! switch input and the sub-second tick position. Lights flashing at the same
//! frequency switch together because flashing is phase-locked to the start of
//! each second.

pub mod types;
pub mod io;
pub mod signal;
pub mod clock;
pub mod random;
pub mod flicker;
pub mod schedule;
pub mod button;
pub mod control;
pub mod config;
pub mod controller;

pub use types::{
    ControlState, FlickerState, InvalidState, LIGHT_COUNT, LightId, LightStates, ScheduleWindow,
    StateMachineKind, TimeOfDay,
};
pub use io::{DebugSink, DigitalInput, LightBank, NO_BACKUP, NullDebug, PersistenceStore};
pub use signal::{EdgeSignal, Signals, TickSignal};
pub use clock::{ClockError, FlashPhase, TickOutcome, TimeBase, eu_dst_offset, flashing_on, month_length};
pub use random::{MinStdRand, RandomSource, randint};
pub use flicker::FlickerStateMachine;
pub use schedule::{FlashRates, LightRule, Schedule, ScheduleBuilder, ScheduleError, ScheduleInputs};
pub use button::{ButtonController, ButtonPressState, PressKind};
pub use control::{ControlError, ControlStateMachine};
pub use config::{Config, ConfigError};
pub use controller::{Hardware, LightController, PollTiming};
