//! Departure board assembly: grouping and presentation.

mod group;
pub mod render;

pub use group::{GroupedDepartures, StationGroup, group_by_station};
pub use render::{NullRenderer, Renderer, TextRenderer};
