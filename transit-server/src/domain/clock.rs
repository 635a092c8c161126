//! Timetable clock handling.
//!
//! The timetable backend stores departure and arrival times as dateless
//! "HH:MM:SS" values in the timetable's fixed timezone. This module provides
//! the `Clock` type for those values and the lifting rule that turns a clock
//! into an absolute instant, handling trains that run past midnight.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use std::fmt;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Error returned for invalid clock text or an unrepresentable instant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock: {reason}")]
pub struct ClockError {
    reason: &'static str,
}

impl ClockError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A time-of-day value from the timetable, without a date.
///
/// Two trains departing at "00:10:00" on consecutive nights carry the same
/// clock; the date only appears once a clock is lifted onto a reference
/// instant with [`Clock::next_on_or_after`].
///
/// # Examples
///
/// ```
/// use transit_server::domain::Clock;
///
/// let c = Clock::parse("09:30:00").unwrap();
/// assert_eq!(c.to_string(), "09:30:00");
///
/// assert!(Clock::parse("9:30:00").is_err());
/// assert!(Clock::parse("24:00:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Clock(NaiveTime);

impl Clock {
    /// Wrap a time-of-day value.
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    /// Parse a clock from "HH:MM:SS" text.
    ///
    /// The backend emits exactly this shape for `TIME` columns; anything
    /// else is treated as corrupt data by the caller.
    pub fn parse(s: &str) -> Result<Self, ClockError> {
        let bytes = s.as_bytes();

        if bytes.len() != 8 {
            return Err(ClockError::new("expected HH:MM:SS format"));
        }
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(ClockError::new("expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| ClockError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(ClockError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| ClockError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(ClockError::new("minute must be 0-59"));
        }

        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| ClockError::new("invalid second digits"))?;
        if second > 59 {
            return Err(ClockError::new("second must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| ClockError::new("invalid time"))?;

        Ok(Self(time))
    }

    /// Returns the underlying time-of-day.
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Waiting time from a reference time-of-day to this clock's next
    /// occurrence, evaluated on a 24-hour dial.
    ///
    /// The result is always in `[0, 24h)`: a clock earlier on the dial than
    /// the reference wraps to tomorrow.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, NaiveTime};
    /// use transit_server::domain::Clock;
    ///
    /// let dep = Clock::parse("23:50:00").unwrap();
    /// let now = NaiveTime::from_hms_opt(23, 55, 0).unwrap();
    /// assert_eq!(dep.wait_from(now), Duration::hours(23) + Duration::minutes(55));
    /// ```
    pub fn wait_from(&self, reference: NaiveTime) -> Duration {
        let c = i64::from(self.0.num_seconds_from_midnight());
        let t = i64::from(reference.num_seconds_from_midnight());
        let wait = if c >= t { c - t } else { c + SECONDS_PER_DAY - t };
        Duration::seconds(wait)
    }

    /// Lift this clock onto the earliest absolute instant at or after
    /// `reference` whose local time-of-day equals the clock.
    ///
    /// The clock is composed with the reference's calendar date; if that
    /// instant is strictly before the reference, one calendar day is added.
    /// A clock equal to the reference's time-of-day resolves to the
    /// reference itself.
    ///
    /// Chaining calls reconstructs `notBefore <= departAt <= arriveAt` for
    /// legs that cross midnight: the arrival clock must be lifted relative
    /// to the already-lifted departure, never the original reference.
    pub fn next_on_or_after(&self, reference: DateTime<Tz>) -> Result<DateTime<Tz>, ClockError> {
        let tz = reference.timezone();
        let date = reference.date_naive();

        let same_day = tz
            .from_local_datetime(&date.and_time(self.0))
            .earliest()
            .ok_or_else(|| ClockError::new("clock does not exist on the reference date"))?;

        if same_day >= reference {
            return Ok(same_day);
        }

        let next_day = date
            .succ_opt()
            .ok_or_else(|| ClockError::new("date overflow"))?;
        tz.from_local_datetime(&next_day.and_time(self.0))
            .earliest()
            .ok_or_else(|| ClockError::new("clock does not exist on the following date"))
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clock({})", self)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
