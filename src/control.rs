//! Clock-edit mode driven by the control button.
//!
//! A long press steps through `Off → Hour → Minute → Second → Day → Month →
//! Year → Off`. A short press edits the selected field of the live clock
//! immediately. While a field is selected, the light bank shows its value in
//! binary (bit `i` on light `i`), with set bits flashing.

use crate::clock::{ClockError, TimeBase, month_length};
use crate::types::{ControlState, InvalidState, LightId, LightStates};
use time::{Date, PrimitiveDateTime};

/// First year of the editable 100-year window.
pub const YEAR_BASE: i32 = 2000;

/// Errors from handling a control-button event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// The stored control state was corrupted and has been reset to `Off`.
    Corrupted(InvalidState),

    /// The edited time could not be committed to the clock.
    Clock(ClockError),
}

impl core::fmt::Display for ControlError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControlError::Corrupted(err) => write!(f, "{}", err),
            ControlError::Clock(err) => write!(f, "clock edit rejected: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ControlError {}

impl From<InvalidState> for ControlError {
    fn from(err: InvalidState) -> Self {
        ControlError::Corrupted(err)
    }
}

impl From<ClockError> for ControlError {
    fn from(err: ClockError) -> Self {
        ControlError::Clock(err)
    }
}

impl From<time::error::ComponentRange> for ControlError {
    fn from(_: time::error::ComponentRange) -> Self {
        ControlError::Clock(ClockError::OutOfRange)
    }
}

/// The clock-edit state machine.
///
/// Like the flicker machine, the state is stored as its raw byte and decoded on
/// every dispatch.
#[derive(Debug, Clone, Default)]
pub struct ControlStateMachine {
    raw: u8,
}

impl ControlStateMachine {
    /// Creates a machine showing the normal schedule.
    pub fn new() -> Self {
        Self {
            raw: ControlState::Off as u8,
        }
    }

    /// Restores a machine from its raw byte. Invalid bytes are caught on the next dispatch.
    pub fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Current state. A corrupted byte reads as `Off`.
    pub fn state(&self) -> ControlState {
        ControlState::try_from(self.raw).unwrap_or_default()
    }

    fn decode(&mut self) -> Result<ControlState, InvalidState> {
        ControlState::try_from(self.raw).inspect_err(|_| {
            self.raw = ControlState::Off as u8;
        })
    }

    /// Moves to the next field, or back to `Off` after `Year`.
    pub fn long_press(&mut self) -> Result<ControlState, ControlError> {
        let next = self.decode()?.next();
        self.raw = next as u8;
        Ok(next)
    }

    /// Edits the selected field of `clock`. Does nothing while `Off`.
    ///
    /// | State | Edit |
    /// |---|---|
    /// | Hour | hour + 1, wrapping at 24 |
    /// | Minute | minute + 1, wrapping at 60 |
    /// | Second | reset to 0 |
    /// | Day | day + 1, wrapping at the month length |
    /// | Month | month + 1, wrapping at 12 |
    /// | Year | year + 1, wrapping within 2000-2099 |
    ///
    /// Month and year edits clamp the day to the new month's length.
    pub fn short_press(&mut self, clock: &mut TimeBase) -> Result<ControlState, ControlError> {
        let state = self.decode()?;
        let local = clock.local_time();

        let edited = match state {
            ControlState::Off => return Ok(state),
            ControlState::Hour => local.replace_hour((local.hour() + 1) % 24)?,
            ControlState::Minute => local.replace_minute((local.minute() + 1) % 60)?,
            ControlState::Second => local.replace_second(0)?,
            ControlState::Day => {
                let length = month_length(local.year(), local.month());
                local.replace_day(local.day() % length + 1)?
            }
            ControlState::Month => with_date(local, local.year(), local.month().next())?,
            ControlState::Year => {
                let year = YEAR_BASE + (local.year() - YEAR_BASE + 1).rem_euclid(100);
                with_date(local, year, local.month())?
            }
        };

        clock.set_local_time(edited)?;
        if state == ControlState::Second {
            clock.align_to_second();
        }
        Ok(state)
    }

    /// The light pattern for the selected field, or `None` while `Off`.
    ///
    /// `display_hz` is the flashing frequency of the set bits.
    pub fn render(&mut self, clock: &TimeBase, display_hz: u16) -> Result<Option<LightStates>, InvalidState> {
        let state = self.decode()?;
        let Some(value) = field_value(state, &clock.local_time()) else {
            return Ok(None);
        };

        let blink_on = clock.phase().flashing_on(display_hz);
        let mut lights = LightStates::ALL_OFF;
        for light in LightId::ALL {
            let bit = value & (1 << light.index()) != 0;
            lights.set(light, bit && blink_on);
        }
        Ok(Some(lights))
    }
}

/// The number shown for `state`: month 1-12, year counted from 2000.
pub fn field_value(state: ControlState, local: &PrimitiveDateTime) -> Option<u16> {
    let value = match state {
        ControlState::Off => return None,
        ControlState::Hour => local.hour() as u16,
        ControlState::Minute => local.minute() as u16,
        ControlState::Second => local.second() as u16,
        ControlState::Day => local.day() as u16,
        ControlState::Month => u8::from(local.month()) as u16,
        ControlState::Year => (local.year() - YEAR_BASE).clamp(0, 1023) as u16,
    };
    Some(value)
}

fn with_date(
    local: PrimitiveDateTime,
    year: i32,
    month: time::Month,
) -> Result<PrimitiveDateTime, time::error::ComponentRange> {
    let day = local.day().min(month_length(year, month));
    let date = Date::from_calendar_date(year, month, day)?;
    Ok(PrimitiveDateTime::new(date, local.time()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn clock_at(local: PrimitiveDateTime) -> TimeBase {
        // UTC offset zero and winter dates keep local equal to UTC.
        let mut clock = TimeBase::new(0, 256, 0);
        clock.set_local_time(local).unwrap();
        clock
    }

    #[test]
    fn short_press_while_off_leaves_clock_alone() {
        let mut clock = clock_at(datetime!(2023-01-10 12:34:56));
        let mut control = ControlStateMachine::new();
        control.short_press(&mut clock).unwrap();
        assert_eq!(clock.local_time(), datetime!(2023-01-10 12:34:56));
    }

    #[test]
    fn hour_wraps_without_changing_the_date() {
        let mut clock = clock_at(datetime!(2023-01-10 23:15:00));
        let mut control = ControlStateMachine::from_raw(ControlState::Hour as u8);
        control.short_press(&mut clock).unwrap();
        assert_eq!(clock.local_time(), datetime!(2023-01-10 00:15:00));
    }

    #[test]
    fn second_resets_to_zero() {
        let mut clock = clock_at(datetime!(2023-01-10 08:00:42));
        let mut control = ControlStateMachine::from_raw(ControlState::Second as u8);
        control.short_press(&mut clock).unwrap();
        assert_eq!(clock.local_time(), datetime!(2023-01-10 08:00:00));
        assert_eq!(clock.subsecond(), 0);
    }

    #[test]
    fn month_edit_clamps_day() {
        let mut clock = clock_at(datetime!(2023-01-31 10:00:00));
        let mut control = ControlStateMachine::from_raw(ControlState::Month as u8);
        control.short_press(&mut clock).unwrap();
        assert_eq!(clock.local_time(), datetime!(2023-02-28 10:00:00));
    }

    #[test]
    fn year_wraps_within_century() {
        let mut clock = clock_at(datetime!(2099-01-05 10:00:00));
        let mut control = ControlStateMachine::from_raw(ControlState::Year as u8);
        control.short_press(&mut clock).unwrap();
        assert_eq!(clock.local_time(), datetime!(2000-01-05 10:00:00));
    }

    #[test]
    fn render_is_none_while_off() {
        let clock = clock_at(datetime!(2023-01-10 12:00:00));
        let mut control = ControlStateMachine::new();
        assert_eq!(control.render(&clock, 2), Ok(None));
    }

    #[test]
    fn corrupted_state_resets_on_render() {
        let clock = clock_at(datetime!(2023-01-10 12:00:00));
        let mut control = ControlStateMachine::from_raw(42);
        assert!(control.render(&clock, 2).is_err());
        assert_eq!(control.state(), ControlState::Off);
        assert_eq!(control.render(&clock, 2), Ok(None));
    }
}
