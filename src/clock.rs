//! Wall-clock keeping driven by a hardware timer tick.
//!
//! [`TimeBase`] accumulates ticks into seconds and tracks absolute UTC time as
//! a single counter of seconds since the Unix epoch. Calendar fields are only
//! derived on demand, so there is no carry cascade to get wrong. Local time is
//! UTC plus a fixed zone offset plus the EU daylight-saving rule in
//! [`eu_dst_offset`].

use crate::io::PersistenceStore;
use crate::types::TimeOfDay;
use time::{Duration, Month, OffsetDateTime, PrimitiveDateTime};

/// One hour in seconds.
pub const ONE_HOUR: i32 = 3600;

/// One day in seconds.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Number of days in `month` of `year`, leap years included.
pub fn month_length(year: i32, month: Month) -> u8 {
    match month {
        Month::February => {
            if time::util::is_leap_year(year) {
                29
            } else {
                28
            }
        }
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// Daylight-saving offset in seconds for a UTC instant, EU rules.
///
/// Summer time runs from 01:00 UTC on the last Sunday of March until 01:00 UTC
/// on the last Sunday of October.
pub fn eu_dst_offset(utc: OffsetDateTime) -> i32 {
    let month = u8::from(utc.month());
    if !(3..=10).contains(&month) {
        return 0;
    }
    if month > 3 && month < 10 {
        return ONE_HOUR;
    }

    // March and October both have 31 days.
    let mday = utc.day() as i32;
    let mut last_sunday = mday - utc.weekday().number_days_from_sunday() as i32;
    let full_weeks_left = (31 - last_sunday) / 7;
    last_sunday += full_weeks_left * 7;

    let before_switch = mday < last_sunday || (mday == last_sunday && utc.hour() < 1);
    match (month == 3, before_switch) {
        (true, true) => 0,
        (true, false) => ONE_HOUR,
        (false, true) => ONE_HOUR,
        (false, false) => 0,
    }
}

fn dst_at(unix: i64) -> i32 {
    OffsetDateTime::from_unix_timestamp(unix)
        .map(eu_dst_offset)
        .unwrap_or(0)
}

/// Square-wave flashing primitive.
///
/// Returns true during the first half of each `1 / freq_hz` period, counting
/// from the start of the current second. Every light flashing at the same
/// frequency therefore switches in lockstep. A frequency of zero means "solid
/// on".
pub fn flashing_on(subsecond: u16, ticks_per_second: u16, freq_hz: u16) -> bool {
    if freq_hz == 0 || ticks_per_second == 0 {
        return true;
    }
    let half_periods = subsecond as u32 * 2 * freq_hz as u32 / ticks_per_second as u32;
    half_periods % 2 == 0
}

/// Position within the current second, used to phase-lock flashing lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashPhase {
    pub subsecond: u16,
    pub ticks_per_second: u16,
}

impl FlashPhase {
    pub const fn new(subsecond: u16, ticks_per_second: u16) -> Self {
        Self {
            subsecond,
            ticks_per_second,
        }
    }

    /// See [`flashing_on`].
    #[inline]
    pub fn flashing_on(&self, freq_hz: u16) -> bool {
        flashing_on(self.subsecond, self.ticks_per_second, freq_hz)
    }
}

/// What a single tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Still inside the current second.
    SubSecond,
    /// A second completed.
    Second,
    /// A second completed and local midnight was reached. The backup with this
    /// UTC timestamp has been written.
    Midnight(u32),
}

/// Errors from setting the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The requested time cannot be represented as a 32-bit Unix timestamp.
    OutOfRange,
}

impl core::fmt::Display for ClockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ClockError::OutOfRange => write!(f, "time outside the 32-bit timestamp range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClockError {}

/// Tick accumulator and wall clock.
#[derive(Debug, Clone)]
pub struct TimeBase {
    unix: u32,
    subsecond: u16,
    ticks_per_second: u16,
    utc_offset_s: i32,
}

impl TimeBase {
    /// Creates a clock at `unix` seconds (UTC), at the start of that second.
    pub fn new(unix: u32, ticks_per_second: u16, utc_offset_s: i32) -> Self {
        Self {
            unix,
            subsecond: 0,
            ticks_per_second: ticks_per_second.max(1),
            utc_offset_s,
        }
    }

    /// Advances the clock by one timer tick.
    ///
    /// Completes a second once `ticks_per_second` ticks have accumulated. If the
    /// new second is local midnight, the UTC timestamp is written to `store`.
    pub fn tick<P: PersistenceStore>(&mut self, store: &mut P) -> TickOutcome {
        self.subsecond += 1;
        if self.subsecond < self.ticks_per_second {
            return TickOutcome::SubSecond;
        }
        self.subsecond = 0;
        self.unix = self.unix.wrapping_add(1);

        if self.local_time_of_day() == TimeOfDay::MIDNIGHT {
            store.write(self.unix);
            return TickOutcome::Midnight(self.unix);
        }
        TickOutcome::Second
    }

    /// Seconds since the Unix epoch, UTC.
    pub fn unix(&self) -> u32 {
        self.unix
    }

    /// Ticks elapsed within the current second.
    pub fn subsecond(&self) -> u16 {
        self.subsecond
    }

    pub fn ticks_per_second(&self) -> u16 {
        self.ticks_per_second
    }

    pub fn utc_offset_s(&self) -> i32 {
        self.utc_offset_s
    }

    /// Current flashing phase.
    pub fn phase(&self) -> FlashPhase {
        FlashPhase::new(self.subsecond, self.ticks_per_second)
    }

    /// Current time as a UTC date-time.
    pub fn utc(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.unix as i64).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    /// Current local date and time (zone offset plus daylight saving).
    pub fn local_time(&self) -> PrimitiveDateTime {
        let utc = self.utc();
        let offset = self.utc_offset_s + eu_dst_offset(utc);
        let local = utc.checked_add(Duration::seconds(offset as i64)).unwrap_or(utc);
        PrimitiveDateTime::new(local.date(), local.time())
    }

    /// Current local time of day.
    pub fn local_time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from(self.local_time().time())
    }

    /// Sets the clock from a local date-time, keeping the sub-second position.
    ///
    /// A local time that occurs twice when summer time ends resolves to the
    /// daylight-saving offset in effect before the call. A local time skipped
    /// when summer time starts is moved forward over the gap.
    pub fn set_local_time(&mut self, local: PrimitiveDateTime) -> Result<(), ClockError> {
        let standard = local.assume_utc().unix_timestamp() - self.utc_offset_s as i64;
        let current = eu_dst_offset(self.utc());
        let unix = [current, ONE_HOUR - current]
            .into_iter()
            .map(|dst| (dst, standard - dst as i64))
            .find(|&(dst, unix)| dst_at(unix) == dst)
            .map_or(standard, |(_, unix)| unix);
        self.unix = u32::try_from(unix).map_err(|_| ClockError::OutOfRange)?;
        Ok(())
    }

    /// Restarts the current second so the next rollover is a full second away.
    pub fn align_to_second(&mut self) {
        self.subsecond = 0;
    }
}
