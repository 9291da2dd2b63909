//! Splitting a configured date range into per-day windows

use crate::window::DayWindow;
use chrono::{Days, NaiveDate};
use chrono_tz::Tz;

/// Partitioning errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PartitionError {
    /// The range is empty or reversed
    #[error("end date ({end}) must be after start date ({start})")]
    InvalidRange {
        /// Configured start date
        start: NaiveDate,
        /// Configured end date
        end: NaiveDate,
    },

    /// Zone name is not in the IANA database
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A window fell outside the representable date range
    #[error("date out of range: {0}")]
    OutOfRange(NaiveDate),
}

/// Resolve an IANA zone name such as `Europe/Moscow`
pub fn resolve_timezone(name: &str) -> Result<Tz, PartitionError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| PartitionError::UnknownTimezone(name.to_string()))
}

/// Number of windows produced for `[start, end)`.
///
/// The last calendar day of the range is not fetched, so a range of `d`
/// days yields `d - 1` windows.
pub fn window_count(start: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - start).num_days();
    usize::try_from(days.saturating_sub(1)).unwrap_or(0)
}

/// Split `[start, end)` into consecutive one-day windows in `tz`.
///
/// Window `i` covers the local day `start + i`, so the first reporting date
/// is `start + 1 day`. Each window is anchored on its own date, which keeps
/// it at local midnight after a zone skips one.
pub fn partition(
    start: NaiveDate,
    end: NaiveDate,
    tz: Tz,
) -> Result<Vec<DayWindow>, PartitionError> {
    if end <= start {
        return Err(PartitionError::InvalidRange { start, end });
    }

    (0..window_count(start, end) as u64)
        .map(|i| {
            start
                .checked_add_days(Days::new(i))
                .and_then(|date| DayWindow::for_date(date, tz))
                .ok_or(PartitionError::OutOfRange(start))
        })
        .collect()
}
