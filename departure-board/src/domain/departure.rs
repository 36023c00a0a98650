//! Departure entries and countdown semantics.

use std::fmt;

/// One upcoming departure at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureEntry {
    /// Id of the station this departure belongs to.
    pub station_id: String,
    pub line_name: String,
    pub direction: String,
    /// Provider vehicle class (`BUS`, `TRAIN`, `SHIP`, ...); empty when unknown.
    pub vehicle_type: String,
    /// Live countdown in minutes. Zero or negative means boarding or overdue.
    pub time_offset_minutes: i32,
    /// Realtime delay in seconds, when reported.
    pub delay_seconds: Option<i32>,
    pub platform: Option<String>,
    pub cancelled: bool,
}

impl DepartureEntry {
    pub fn countdown(&self) -> Countdown {
        Countdown::from_offset(self.time_offset_minutes)
    }
}

/// A countdown as shown to riders.
///
/// # Examples
///
/// ```
/// use departure_board::domain::Countdown;
///
/// assert_eq!(Countdown::from_offset(-1), Countdown::Now);
/// assert_eq!(Countdown::from_offset(0).to_string(), "now");
/// assert_eq!(Countdown::from_offset(7).to_string(), "7 min");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Countdown {
    Now,
    Minutes(u32),
}

impl Countdown {
    pub fn from_offset(minutes: i32) -> Self {
        match u32::try_from(minutes) {
            Ok(0) | Err(_) => Countdown::Now,
            Ok(n) => Countdown::Minutes(n),
        }
    }

    /// Minutes until departure, clamped at zero.
    pub fn minutes(self) -> u32 {
        match self {
            Countdown::Now => 0,
            Countdown::Minutes(n) => n,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Countdown::Now => "now".to_string(),
            Countdown::Minutes(n) => format!("{n} min"),
        };
        // pad so callers can align with width specifiers
        f.pad(&text)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Non-positive offsets always collapse to `Now`
        #[test]
        fn non_positive_is_now(offset in i32::MIN..=0) {
            prop_assert_eq!(Countdown::from_offset(offset), Countdown::Now);
        }

        /// Positive offsets keep their value
        #[test]
        fn positive_keeps_minutes(offset in 1..=i32::MAX) {
            prop_assert_eq!(Countdown::from_offset(offset), Countdown::Minutes(offset as u32));
        }

        /// A countdown never renders as a negative duration
        #[test]
        fn never_renders_negative(offset in any::<i32>()) {
            prop_assert!(!Countdown::from_offset(offset).to_string().contains('-'));
        }
    }
}
