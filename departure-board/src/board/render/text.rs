//! Plain text board for terminals.

use std::io::{self, Write};

use crate::board::group::GroupedDepartures;
use crate::domain::DepartureEntry;

use super::Renderer;

/// Writes one block per station to any `io::Write`.
///
/// ```text
/// Hamburg, Grindelhof
///    now  U1   Norderstedt Mitte [TRAIN]
///  3 min  5    Burgwedel [BUS]
/// ```
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

fn departure_line(departure: &DepartureEntry) -> String {
    let mut line = format!(
        "{:>6}  {:<4} {}",
        departure.countdown(),
        departure.line_name,
        departure.direction
    );
    if !departure.vehicle_type.is_empty() {
        line.push_str(&format!(" [{}]", departure.vehicle_type));
    }
    if departure.cancelled {
        line.push_str(" (cancelled)");
    }
    line
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, board: &GroupedDepartures) -> io::Result<()> {
        for group in board {
            writeln!(self.out, "{}", group.station.display_name())?;
            if group.departures.is_empty() {
                writeln!(self.out, "  no departures")?;
            }
            for departure in &group.departures {
                writeln!(self.out, "{}", departure_line(departure))?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}
