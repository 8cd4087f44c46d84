//! Static configuration of the light controller.

use crate::schedule::{FlashRates, Schedule};
use crate::clock::ONE_HOUR;

/// 2000-01-01 00:00:00 UTC.
pub const DEFAULT_UNIX_TIME: u32 = 946_684_800;

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The timer tick cadence is zero.
    ZeroTickRate,

    /// The long-press threshold is zero.
    ZeroLongPress,

    /// The minimum press time is not below the long-press threshold.
    MinPressNotBelowLongPress,

    /// A flashing frequency is above half the tick cadence and cannot be rendered.
    FlashTooFast { freq_hz: u16, ticks_per_second: u16 },

    /// The UTC offset is more than 14 hours.
    UtcOffsetOutOfRange(i32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTickRate => write!(f, "ticks per second must be non-zero"),
            ConfigError::ZeroLongPress => write!(f, "long-press threshold must be non-zero"),
            ConfigError::MinPressNotBelowLongPress => {
                write!(f, "minimum press time must be below the long-press threshold")
            }
            ConfigError::FlashTooFast {
                freq_hz,
                ticks_per_second,
            } => write!(
                f,
                "flash frequency {} Hz needs at least {} ticks per second, have {}",
                freq_hz,
                *freq_hz as u32 * 2,
                ticks_per_second
            ),
            ConfigError::UtcOffsetOutOfRange(offset) => {
                write!(f, "UTC offset {} s is out of range", offset)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Everything the controller needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Standard-time offset from UTC in seconds. Daylight saving is added on top.
    pub utc_offset_s: i32,
    /// Timer ticks per second.
    pub ticks_per_second: u16,
    /// Hold time at which a press counts as long.
    pub long_press_ms: u32,
    /// Presses shorter than this are ignored.
    pub min_press_ms: u32,
    /// Flashing frequencies.
    pub flash: FlashRates,
    /// Clock start value when no backup is stored.
    pub default_unix_time: u32,
    /// Seconds between local-time dumps to the debug sink, 0 to disable.
    pub time_dump_interval_s: u32,
    /// Rule for every light.
    pub schedule: Schedule,
}

impl Config {
    /// Creates a configuration with the default settings and the given schedule.
    pub fn new(schedule: Schedule) -> Self {
        Self {
            utc_offset_s: ONE_HOUR,
            ticks_per_second: 256,
            long_press_ms: 1000,
            min_press_ms: 1,
            flash: FlashRates::default(),
            default_unix_time: DEFAULT_UNIX_TIME,
            time_dump_interval_s: 0,
            schedule,
        }
    }

    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        self.utc_offset_s = seconds;
        self
    }

    pub fn with_ticks_per_second(mut self, ticks: u16) -> Self {
        self.ticks_per_second = ticks;
        self
    }

    pub fn with_long_press_ms(mut self, ms: u32) -> Self {
        self.long_press_ms = ms;
        self
    }

    pub fn with_min_press_ms(mut self, ms: u32) -> Self {
        self.min_press_ms = ms;
        self
    }

    pub fn with_flash_rates(mut self, flash: FlashRates) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_default_unix_time(mut self, unix: u32) -> Self {
        self.default_unix_time = unix;
        self
    }

    pub fn with_time_dump_interval(mut self, seconds: u32) -> Self {
        self.time_dump_interval_s = seconds;
        self
    }

    /// Checks the settings for values the controller cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.long_press_ms == 0 {
            return Err(ConfigError::ZeroLongPress);
        }
        if self.min_press_ms >= self.long_press_ms {
            return Err(ConfigError::MinPressNotBelowLongPress);
        }
        for freq_hz in [self.flash.announce_hz, self.flash.display_hz] {
            if freq_hz as u32 * 2 > self.ticks_per_second as u32 {
                return Err(ConfigError::FlashTooFast {
                    freq_hz,
                    ticks_per_second: self.ticks_per_second,
                });
            }
        }
        if self.utc_offset_s.abs() > 14 * ONE_HOUR {
            return Err(ConfigError::UtcOffsetOutOfRange(self.utc_offset_s));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Schedule::canonical())
    }
}
