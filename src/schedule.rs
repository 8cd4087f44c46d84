//! Declarative light schedule and its evaluator.
//!
//! A [`Schedule`] assigns one [`LightRule`] to every [`LightId`]. Evaluating it
//! for a local time of day, the flicker light's state and the switch input
//! yields the full [`LightStates`] vector for one cycle.

use crate::clock::FlashPhase;
use crate::types::{FlickerState, LIGHT_COUNT, LightId, LightStates, ScheduleWindow, TimeOfDay};

/// Minute of the hour at which every class block starts.
pub const BLOCK_BEGIN_MINUTE: u8 = 45;

/// Minute of the hour at which every class block ends.
pub const BLOCK_END_MINUTE: u8 = 30;

/// Minute of the hour at which a block's announcement starts flashing.
pub const BLOCK_ANNOUNCE_MINUTE: u8 = 37;

/// How a single light decides whether it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightRule {
    /// On while the time is inside the window.
    Window(ScheduleWindow),

    /// A class block: solid inside `main`, flashing inside `announce`, off otherwise.
    ///
    /// `announce` is expected to end where `main` starts. When both contain the
    /// current time, `main` wins.
    Block {
        main: ScheduleWindow,
        announce: ScheduleWindow,
    },

    /// Mirrors the external switch input.
    Switch,

    /// On while any block in the schedule is being announced.
    AnnounceAny,

    /// Follows the flicker state machine.
    Flicker,
}

impl LightRule {
    /// A class block from `start_hour:45` to `end_hour:30`, announced from `start_hour:37`.
    pub const fn class_block(start_hour: u8, end_hour: u8) -> Self {
        LightRule::Block {
            main: ScheduleWindow::new(
                TimeOfDay::hm(start_hour, BLOCK_BEGIN_MINUTE),
                TimeOfDay::hm(end_hour, BLOCK_END_MINUTE),
            ),
            announce: ScheduleWindow::new(
                TimeOfDay::hm(start_hour, BLOCK_ANNOUNCE_MINUTE),
                TimeOfDay::hm(start_hour, BLOCK_BEGIN_MINUTE),
            ),
        }
    }

    /// A plain `start..=end` window rule built from hours and minutes.
    pub const fn window(start: (u8, u8), end: (u8, u8)) -> Self {
        LightRule::Window(ScheduleWindow::new(
            TimeOfDay::hm(start.0, start.1),
            TimeOfDay::hm(end.0, end.1),
        ))
    }
}

/// The schedule the light bank was built for.
pub const CANONICAL_RULES: [LightRule; LIGHT_COUNT] = [
    // Down: night.
    LightRule::window((21, 30), (8, 0)),
    LightRule::class_block(8, 10),
    LightRule::class_block(10, 12),
    LightRule::class_block(13, 15),
    LightRule::class_block(15, 17),
    // Five: cafeteria opening hours.
    LightRule::window((15, 0), (17, 0)),
    // Beer.
    LightRule::window((16, 0), (21, 0)),
    LightRule::Flicker,
    LightRule::Switch,
    LightRule::AnnounceAny,
];

/// Flashing frequencies used by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashRates {
    /// Frequency of a block's announce flashing.
    pub announce_hz: u16,
    /// Frequency of the flicker light and the clock-edit read-out.
    pub display_hz: u16,
}

impl Default for FlashRates {
    fn default() -> Self {
        Self {
            announce_hz: 1,
            display_hz: 2,
        }
    }
}

/// Everything besides the schedule itself that a cycle's output depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleInputs {
    /// Local time of day.
    pub now: TimeOfDay,
    /// Position within the current second.
    pub phase: FlashPhase,
    /// State of the flicker light.
    pub flicker: FlickerState,
    /// External switch input.
    pub switch_on: bool,
}

/// Schedule validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// A light has no rule.
    MissingRule(LightId),

    /// A light was given more than one rule.
    DuplicateRule(LightId),

    /// A block's announce window does not end where its main window starts.
    DetachedAnnounce(LightId),
}

impl core::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScheduleError::MissingRule(light) => {
                write!(f, "light {:?} has no rule", light)
            }
            ScheduleError::DuplicateRule(light) => {
                write!(f, "light {:?} has more than one rule", light)
            }
            ScheduleError::DetachedAnnounce(light) => {
                write!(
                    f,
                    "announce window of light {:?} must end at the start of its block",
                    light
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScheduleError {}

/// A validated rule for every light.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    rules: [LightRule; LIGHT_COUNT],
}

impl Schedule {
    /// Creates a new schedule builder.
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::new()
    }

    /// The schedule in [`CANONICAL_RULES`].
    pub fn canonical() -> Self {
        Self {
            rules: CANONICAL_RULES,
        }
    }

    /// Returns the rule for `light`.
    pub fn rule(&self, light: LightId) -> &LightRule {
        &self.rules[light.index()]
    }

    /// Computes every light for one cycle.
    pub fn evaluate(&self, inputs: &ScheduleInputs, rates: &FlashRates) -> LightStates {
        let mut lights = LightStates::ALL_OFF;
        for light in LightId::ALL {
            lights.set(light, self.light_on(light, inputs, rates));
        }
        lights
    }

    /// Computes a single light.
    pub fn light_on(&self, light: LightId, inputs: &ScheduleInputs, rates: &FlashRates) -> bool {
        match self.rules[light.index()] {
            LightRule::Window(window) => window.contains(inputs.now),
            LightRule::Block { main, announce } => {
                if main.contains(inputs.now) {
                    true
                } else if announce.contains(inputs.now) {
                    inputs.phase.flashing_on(rates.announce_hz)
                } else {
                    false
                }
            }
            LightRule::Switch => inputs.switch_on,
            LightRule::AnnounceAny => self.any_announce_active(inputs.now),
            LightRule::Flicker => match inputs.flicker {
                FlickerState::Off => false,
                FlickerState::On => true,
                FlickerState::Flashing => inputs.phase.flashing_on(rates.display_hz),
            },
        }
    }

    /// Returns true if any block's announce window contains `now`.
    pub fn any_announce_active(&self, now: TimeOfDay) -> bool {
        self.rules.iter().any(|rule| match rule {
            LightRule::Block { announce, .. } => announce.contains(now),
            _ => false,
        })
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Builder for constructing validated schedules.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    rules: [Option<LightRule>; LIGHT_COUNT],
    duplicate: Option<LightId>,
}

impl ScheduleBuilder {
    /// Creates a builder with no rules.
    pub fn new() -> Self {
        Self {
            rules: [None; LIGHT_COUNT],
            duplicate: None,
        }
    }

    /// Assigns `rule` to `light`.
    pub fn rule(mut self, light: LightId, rule: LightRule) -> Self {
        let slot = &mut self.rules[light.index()];
        if slot.is_some() && self.duplicate.is_none() {
            self.duplicate = Some(light);
        }
        *slot = Some(rule);
        self
    }

    /// Builds and validates the schedule.
    ///
    /// # Errors
    /// * `DuplicateRule` - A light was assigned twice
    /// * `MissingRule` - A light has no rule
    /// * `DetachedAnnounce` - A block's announce window does not end at its start
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        if let Some(light) = self.duplicate {
            return Err(ScheduleError::DuplicateRule(light));
        }

        let mut rules = CANONICAL_RULES;
        for light in LightId::ALL {
            let rule = self.rules[light.index()].ok_or(ScheduleError::MissingRule(light))?;
            if let LightRule::Block { main, announce } = rule {
                if announce.end != main.start {
                    return Err(ScheduleError::DetachedAnnounce(light));
                }
            }
            rules[light.index()] = rule;
        }

        Ok(Schedule { rules })
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
