//! Domain types for the departure board.
//!
//! These are the values that flow between the protocol client, the
//! aggregator and the renderers. Provider wire formats live in `gti`.

mod departure;
mod station;
mod time;

pub use departure::{Countdown, DepartureEntry};
pub use station::{StationKind, StationQuery, StationRecord};
pub use time::{Clock, FixedClock, SystemClock, TimeAnchor};
