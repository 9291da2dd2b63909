//! Timestamps and calendar-day windows
//!
//! [`Timestamp`] is an immutable instant in a fixed time zone. Every transform
//! returns a new value. Day shifts are calendar based, so a 23 or 25 hour day
//! still moves local midnight to local midnight.
//!
//! A [`DayWindow`] is always anchored on a calendar date: it runs from the
//! first instant of that day to the first instant of the next one, even when
//! a zone skips midnight.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// An instant expressed in a fixed time zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Tz>);

impl Timestamp {
    /// Current instant in `tz`
    pub fn now(tz: Tz) -> Self {
        Self(Utc::now().with_timezone(&tz))
    }

    /// Wrap an existing instant
    pub fn from_datetime(datetime: DateTime<Tz>) -> Self {
        Self(datetime)
    }

    /// Local midnight of `date` in `tz`
    ///
    /// Returns `None` only if the date cannot be represented.
    pub fn start_of_day(date: NaiveDate, tz: Tz) -> Option<Self> {
        resolve_local(tz, date.and_time(NaiveTime::MIN)).map(Self)
    }

    /// Same local wall-clock time `days` calendar days later
    pub fn days_after(self, days: u64) -> Option<Self> {
        let naive = self.0.naive_local();
        let shifted = naive.date().checked_add_days(Days::new(days))?;
        resolve_local(self.timezone(), shifted.and_time(naive.time())).map(Self)
    }

    /// Same local wall-clock time `days` calendar days earlier
    pub fn days_before(self, days: u64) -> Option<Self> {
        let naive = self.0.naive_local();
        let shifted = naive.date().checked_sub_days(Days::new(days))?;
        resolve_local(self.timezone(), shifted.and_time(naive.time())).map(Self)
    }

    /// Milliseconds since the Unix epoch
    pub fn as_epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Calendar day in the timestamp's own zone
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// The wrapped instant
    pub fn to_datetime(self) -> DateTime<Tz> {
        self.0
    }

    /// Zone the timestamp is expressed in
    pub fn timezone(&self) -> Tz {
        self.0.timezone()
    }
}

/// Wire format: decimal epoch milliseconds
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_epoch_millis())
    }
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are moved forward by the gap (one hour for every zone in use).
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let forward = naive.checked_add_signed(chrono::Duration::hours(1))?;
            tz.from_local_datetime(&forward).earliest()
        }
    }
}

/// Half-open interval `[begin, end)` covering one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayWindow {
    begin: Timestamp,
    end: Timestamp,
}

impl DayWindow {
    /// Window covering the local day `date`, from its first instant to the
    /// first instant of the following day
    pub fn for_date(date: NaiveDate, tz: Tz) -> Option<Self> {
        let begin = Timestamp::start_of_day(date, tz)?;
        let end = Timestamp::start_of_day(date.checked_add_days(Days::new(1))?, tz)?;
        Some(Self { begin, end })
    }

    /// Inclusive start of the window
    pub fn begin(&self) -> Timestamp {
        self.begin
    }

    /// Exclusive end of the window
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Calendar day a reading for this window is reported under.
    ///
    /// This is the day of `end`, matching how the telemetry API attributes
    /// the odometer value at the close of the interval.
    pub fn date(&self) -> NaiveDate {
        self.end.date()
    }

    /// The window `days` calendar days later
    pub fn days_after(self, days: u64) -> Option<Self> {
        let date = self.begin.date().checked_add_days(Days::new(days))?;
        Self::for_date(date, self.begin.timezone())
    }

    /// The window `days` calendar days earlier
    pub fn days_before(self, days: u64) -> Option<Self> {
        let date = self.begin.date().checked_sub_days(Days::new(days))?;
        Self::for_date(date, self.begin.timezone())
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.begin.0.format("%Y-%m-%d %H:%M %Z"),
            self.end.0.format("%Y-%m-%d %H:%M %Z")
        )
    }
}
