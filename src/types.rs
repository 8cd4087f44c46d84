//! Core types shared by the clock, the schedule and the state machines.

/// Number of addressable lights in the bank.
pub const LIGHT_COUNT: usize = 10;

/// A wall-clock time within one day.
///
/// Ordered lexicographically (hour, minute, second). The day wraps at 24:00:00,
/// which is why window checks go through [`TimeOfDay::is_between`] instead of
/// plain comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// Midnight, 00:00:00.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Creates a time of day, returning `None` if any field is out of range.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    /// Creates `hour:minute:00` for constant tables.
    ///
    /// # Panics
    /// Panics if the fields are out of range. In a `const` context this is a
    /// compile error.
    pub const fn hm(hour: u8, minute: u8) -> Self {
        match Self::new(hour, minute, 0) {
            Some(t) => t,
            None => panic!("time of day out of range"),
        }
    }

    /// Builds a time of day from seconds since midnight, wrapping at one day.
    pub const fn from_seconds(seconds: u32) -> Self {
        let s = seconds % 86_400;
        Self {
            hour: (s / 3600) as u8,
            minute: ((s / 60) % 60) as u8,
            second: (s % 60) as u8,
        }
    }

    /// Seconds since midnight.
    pub const fn as_seconds(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Inclusive window check that understands windows spanning midnight.
    ///
    /// With `start <= end` this is `start <= self <= end`. With `start > end`
    /// the window wraps and the check becomes `self >= start || self <= end`.
    pub fn is_between(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        if start <= end {
            start <= *self && *self <= end
        } else {
            start <= *self || *self <= end
        }
    }
}

impl From<time::Time> for TimeOfDay {
    fn from(t: time::Time) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// An inclusive time window, possibly spanning midnight (`end < start`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleWindow {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Returns true if `now` lies inside the window.
    #[inline]
    pub fn contains(&self, now: TimeOfDay) -> bool {
        now.is_between(self.start, self.end)
    }
}

/// The ten lights of the bank, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LightId {
    /// Night light.
    Down = 0,
    /// First class block.
    Block1 = 1,
    /// Second class block.
    Block2 = 2,
    /// Third class block.
    Block3 = 3,
    /// Fourth class block.
    Block4 = 4,
    /// Cafeteria opening hours.
    Five = 5,
    /// Beer time.
    Beer = 6,
    /// Randomly flickering auxiliary light.
    K = 7,
    /// Mirrors the external switch.
    Switch = 8,
    /// Lit while any block is being announced.
    Upcoming = 9,
}

impl LightId {
    /// All lights in output order.
    pub const ALL: [LightId; LIGHT_COUNT] = [
        LightId::Down,
        LightId::Block1,
        LightId::Block2,
        LightId::Block3,
        LightId::Block4,
        LightId::Five,
        LightId::Beer,
        LightId::K,
        LightId::Switch,
        LightId::Upcoming,
    ];

    /// Position of this light in the output vector.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// On/off value for every light, indexed by [`LightId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightStates([bool; LIGHT_COUNT]);

impl LightStates {
    /// Every light off.
    pub const ALL_OFF: Self = Self([false; LIGHT_COUNT]);

    /// Every light on.
    pub const ALL_ON: Self = Self([true; LIGHT_COUNT]);

    #[inline]
    pub fn get(&self, light: LightId) -> bool {
        self.0[light.index()]
    }

    #[inline]
    pub fn set(&mut self, light: LightId, on: bool) {
        self.0[light.index()] = on;
    }

    /// Packs the lights into a bitmask, bit `i` holding light `i`.
    pub fn to_bits(&self) -> u16 {
        self.0
            .iter()
            .enumerate()
            .fold(0u16, |bits, (i, &on)| bits | ((on as u16) << i))
    }

    /// Unpacks a bitmask produced by [`LightStates::to_bits`]. Bits above
    /// [`LIGHT_COUNT`] are ignored.
    pub fn from_bits(bits: u16) -> Self {
        Self(core::array::from_fn(|i| bits & (1 << i) != 0))
    }

    /// Number of lit lights.
    pub fn count_on(&self) -> usize {
        self.0.iter().filter(|&&on| on).count()
    }
}

/// State of the randomly flickering "k" light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FlickerState {
    #[default]
    Off = 0,
    On = 1,
    Flashing = 2,
}

impl TryFrom<u8> for FlickerState {
    type Error = InvalidState;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(FlickerState::Off),
            1 => Ok(FlickerState::On),
            2 => Ok(FlickerState::Flashing),
            _ => Err(InvalidState {
                machine: StateMachineKind::Flicker,
                raw,
            }),
        }
    }
}

/// Clock-edit mode. Anything but `Off` selects the field being shown and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ControlState {
    /// Normal schedule display.
    #[default]
    Off = 0,
    Hour = 1,
    Minute = 2,
    Second = 3,
    Day = 4,
    Month = 5,
    Year = 6,
}

impl ControlState {
    /// The state a long press moves to.
    pub fn next(self) -> Self {
        match self {
            ControlState::Off => ControlState::Hour,
            ControlState::Hour => ControlState::Minute,
            ControlState::Minute => ControlState::Second,
            ControlState::Second => ControlState::Day,
            ControlState::Day => ControlState::Month,
            ControlState::Month => ControlState::Year,
            ControlState::Year => ControlState::Off,
        }
    }

    /// Returns true while the clock-edit mode is active.
    pub fn is_editing(self) -> bool {
        self != ControlState::Off
    }
}

impl TryFrom<u8> for ControlState {
    type Error = InvalidState;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ControlState::Off),
            1 => Ok(ControlState::Hour),
            2 => Ok(ControlState::Minute),
            3 => Ok(ControlState::Second),
            4 => Ok(ControlState::Day),
            5 => Ok(ControlState::Month),
            6 => Ok(ControlState::Year),
            _ => Err(InvalidState {
                machine: StateMachineKind::Control,
                raw,
            }),
        }
    }
}

/// Which state machine detected a corrupted state byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateMachineKind {
    Flicker,
    Control,
}

/// A stored state byte that does not decode to any state.
///
/// The owning machine has already been reset to its `Off` state when this is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidState {
    pub machine: StateMachineKind,
    pub raw: u8,
}

impl core::fmt::Display for InvalidState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self.machine {
            StateMachineKind::Flicker => "flicker",
            StateMachineKind::Control => "control",
        };
        write!(f, "invalid {} state {}, reset to off", name, self.raw)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidState {}
