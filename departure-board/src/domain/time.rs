//! Time anchors for departure requests.
//!
//! The provider wants the reference time as two strings, `DD.MM.YYYY` and
//! `HH:MM`, taken from local wall-clock time when the request is built.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Reference time of a departure request.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use departure_board::domain::TimeAnchor;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 5)
///     .unwrap()
///     .and_hms_opt(7, 4, 59)
///     .unwrap();
/// let anchor = TimeAnchor::from_datetime(at);
/// assert_eq!(anchor.date, "05.03.2024");
/// assert_eq!(anchor.time, "07:04");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeAnchor {
    pub date: String,
    pub time: String,
}

impl TimeAnchor {
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            date: at.format("%d.%m.%Y").to_string(),
            time: at.format("%H:%M").to_string(),
        }
    }

    /// Anchor at the clock's current time.
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_datetime(clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_opt(h, m, 30)
            .unwrap()
    }

    #[test]
    fn formats_with_leading_zeros() {
        let anchor = TimeAnchor::from_datetime(at(0, 5));
        assert_eq!(anchor.date, "31.12.2025");
        assert_eq!(anchor.time, "00:05");
    }

    #[test]
    fn fixed_clock_anchor() {
        let clock = FixedClock(at(23, 59));
        assert_eq!(
            TimeAnchor::now(&clock),
            TimeAnchor {
                date: "31.12.2025".into(),
                time: "23:59".into(),
            }
        );
    }

    #[test]
    fn serializes_as_date_then_time() {
        let anchor = TimeAnchor::from_datetime(at(14, 30));
        assert_eq!(
            serde_json::to_string(&anchor).unwrap(),
            r#"{"date":"31.12.2025","time":"14:30"}"#
        );
    }
}
