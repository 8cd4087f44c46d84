//! The poll loop that ties the clock, the state machines and the schedule together.
//!
//! [`LightController`] owns all device state. The firmware's main loop calls
//! [`LightController::poll`] whenever an interrupt wakes it; interrupt handlers
//! only post to the shared [`Signals`].
//!
//! ```ignore
//! static SIGNALS: Signals = Signals::new();
//!
//! let mut controller = LightController::new(config, &SIGNALS, hardware, MinStdRand::new(seed))?;
//! loop {
//!     match controller.poll(1) {
//!         PollTiming::ButtonHeld => delay.delay_ms(1),
//!         PollTiming::Idle => cortex_m::asm::wfi(),
//!     }
//! }
//! ```

use core::fmt::Write;

use heapless::String;
use time::PrimitiveDateTime;

use crate::button::{ButtonController, PressKind};
use crate::config::{Config, ConfigError};
use crate::control::{ControlError, ControlStateMachine};
use crate::flicker::FlickerStateMachine;
use crate::io::{DebugSink, DigitalInput, LightBank, NO_BACKUP, PersistenceStore};
use crate::random::RandomSource;
use crate::schedule::ScheduleInputs;
use crate::signal::Signals;
use crate::clock::{TickOutcome, TimeBase};
use crate::types::{ControlState, FlickerState, InvalidState, LightStates};

/// Longest debug line; longer lines are truncated.
pub const LOG_LINE_CAPACITY: usize = 64;

/// What the caller should do before the next poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollTiming {
    /// Nothing pending. Sleep until the next interrupt.
    Idle,

    /// A button press is being measured. Poll again after about 1 ms.
    ButtonHeld,
}

/// The board-side collaborators.
pub struct Hardware<L, S, B, P, D> {
    /// Light bank output.
    pub lights: L,
    /// Canteen switch input.
    pub switch: S,
    /// Control button level.
    pub button: B,
    /// Daily clock backup.
    pub store: P,
    /// Debug text output.
    pub debug: D,
}

/// Drives the light bank from the clock, the schedule and the control button.
///
/// # Type Parameters
/// * `'s` - Lifetime of the interrupt signals
/// * `L` - Light bank implementation
/// * `S` - Switch input implementation
/// * `B` - Button input implementation
/// * `P` - Backup storage implementation
/// * `R` - Random number generator for the flicker light
/// * `D` - Debug sink implementation
pub struct LightController<'s, L, S, B, P, R, D>
where
    L: LightBank,
    S: DigitalInput,
    B: DigitalInput,
    P: PersistenceStore,
    R: RandomSource,
    D: DebugSink,
{
    signals: &'s Signals,
    hw: Hardware<L, S, B, P, D>,
    rng: R,
    config: Config,
    clock: TimeBase,
    flicker: FlickerStateMachine,
    control: ControlStateMachine,
    button: ButtonController,
    last_output: LightStates,
    seconds_since_dump: u32,
}

impl<'s, L, S, B, P, R, D> LightController<'s, L, S, B, P, R, D>
where
    L: LightBank,
    S: DigitalInput,
    B: DigitalInput,
    P: PersistenceStore,
    R: RandomSource,
    D: DebugSink,
{
    /// Validates `config`, switches every light on and seeds the clock from the backup.
    ///
    /// # Errors
    /// Returns the first problem [`Config::validate`] finds.
    pub fn new(
        config: Config,
        signals: &'s Signals,
        mut hw: Hardware<L, S, B, P, D>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        hw.lights.write(&LightStates::ALL_ON);

        let backup = hw.store.read();
        let restored = backup != NO_BACKUP;
        let unix = if restored {
            backup
        } else {
            config.default_unix_time
        };

        let clock = TimeBase::new(unix, config.ticks_per_second, config.utc_offset_s);
        let button = ButtonController::new(config.long_press_ms, config.min_press_ms);

        let mut controller = Self {
            signals,
            hw,
            rng,
            config,
            clock,
            flicker: FlickerStateMachine::new(),
            control: ControlStateMachine::new(),
            button,
            last_output: LightStates::ALL_ON,
            seconds_since_dump: 0,
        };

        let now = LocalStamp(controller.clock.local_time());
        if restored {
            controller.log(format_args!("start, clock restored to {}", now));
        } else {
            controller.log(format_args!("start, no backup, clock set to {}", now));
        }
        #[cfg(feature = "defmt")]
        defmt::info!("light controller started, backup restored: {}", restored);

        Ok(controller)
    }

    /// Runs one cycle of the poll loop.
    ///
    /// # Arguments
    /// * `elapsed_ms` - Milliseconds since the previous poll, used to measure button holds
    pub fn poll(&mut self, elapsed_ms: u32) -> PollTiming {
        let ticks = self.signals.ticks.take();
        for _ in 0..ticks {
            match self.clock.tick(&mut self.hw.store) {
                TickOutcome::SubSecond => {}
                TickOutcome::Second => self.on_second(),
                TickOutcome::Midnight(timestamp) => {
                    self.log(format_args!("midnight, backup {}", timestamp));
                    self.on_second();
                }
            }
        }

        if self.signals.button_edge.take() {
            self.button.on_rising_edge();
        }
        let is_down = self.hw.button.read();
        if let Some(press) = self.button.poll(is_down, elapsed_ms) {
            self.on_press(press);
        }

        self.refresh_lights();

        if self.button.is_measuring() {
            PollTiming::ButtonHeld
        } else {
            PollTiming::Idle
        }
    }

    fn on_second(&mut self) {
        if let Err(err) = self.flicker.update(&mut self.rng) {
            self.report_corruption(err);
        }

        if self.config.time_dump_interval_s > 0 {
            self.seconds_since_dump += 1;
            if self.seconds_since_dump >= self.config.time_dump_interval_s {
                self.seconds_since_dump = 0;
                let now = LocalStamp(self.clock.local_time());
                self.log(format_args!("{}", now));
            }
        }
    }

    fn on_press(&mut self, press: PressKind) {
        let result = match press {
            PressKind::Long => self.control.long_press(),
            PressKind::Short => self.control.short_press(&mut self.clock),
        };

        match (press, result) {
            (PressKind::Long, Ok(state)) => self.log(format_args!("control {:?}", state)),
            (PressKind::Short, Ok(state)) if state.is_editing() => {
                let now = LocalStamp(self.clock.local_time());
                self.log(format_args!("set {:?}, now {}", state, now));
            }
            (PressKind::Short, Ok(_)) => {}
            (_, Err(ControlError::Corrupted(err))) => self.report_corruption(err),
            (_, Err(err @ ControlError::Clock(_))) => self.log(format_args!("{}", err)),
        }
    }

    fn refresh_lights(&mut self) {
        let output = match self.control.render(&self.clock, self.config.flash.display_hz) {
            Ok(Some(readout)) => readout,
            Ok(None) => self.schedule_lights(),
            Err(err) => {
                self.report_corruption(err);
                self.schedule_lights()
            }
        };

        self.hw.lights.write(&output);
        self.hw.lights.set_edit_indicator(self.control.state().is_editing());
        self.last_output = output;
    }

    fn schedule_lights(&mut self) -> LightStates {
        let inputs = ScheduleInputs {
            now: self.clock.local_time_of_day(),
            phase: self.clock.phase(),
            flicker: self.flicker.state(),
            switch_on: self.hw.switch.read(),
        };
        self.config.schedule.evaluate(&inputs, &self.config.flash)
    }

    fn report_corruption(&mut self, err: InvalidState) {
        #[cfg(feature = "defmt")]
        defmt::warn!("{}", err);
        self.log(format_args!("{}", err));
    }

    fn log(&mut self, args: core::fmt::Arguments<'_>) {
        let mut line: String<LOG_LINE_CAPACITY> = String::new();
        // Keeps whatever fit before the buffer filled up.
        let _ = line.write_fmt(args);
        self.hw.debug.write_str(&line);
    }

    /// The wall clock.
    pub fn clock(&self) -> &TimeBase {
        &self.clock
    }

    /// Mutable access to the wall clock, e.g. to set it from an external source.
    pub fn clock_mut(&mut self) -> &mut TimeBase {
        &mut self.clock
    }

    pub fn flicker_state(&self) -> FlickerState {
        self.flicker.state()
    }

    pub fn control_state(&self) -> ControlState {
        self.control.state()
    }

    /// The vector written to the light bank by the last poll.
    pub fn last_output(&self) -> LightStates {
        self.last_output
    }

    /// Raw state bytes of the flicker and control machines, for retained memory.
    pub fn retained_state(&self) -> (u8, u8) {
        (self.flicker.raw(), self.control.raw())
    }

    /// Restores the raw state bytes saved by [`LightController::retained_state`].
    ///
    /// Bytes that do not decode are detected on the next poll and reset to `Off`.
    pub fn restore_state(&mut self, flicker_raw: u8, control_raw: u8) {
        self.flicker = FlickerStateMachine::from_raw(flicker_raw);
        self.control = ControlStateMachine::from_raw(control_raw);
    }

    pub fn hardware(&self) -> &Hardware<L, S, B, P, D> {
        &self.hw
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// `YYYY-MM-DD HH:MM:SS` formatting for log lines.
struct LocalStamp(PrimitiveDateTime);

impl core::fmt::Display for LocalStamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let t = &self.0;
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            t.year(),
            u8::from(t.month()),
            t.day(),
            t.hour(),
            t.minute(),
            t.second()
        )
    }
}
