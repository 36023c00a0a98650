//! Presentation sinks for grouped departures.

mod matrix;
mod text;

use std::io;

use super::group::GroupedDepartures;

pub use matrix::{Canvas, Color, DrawOp, Font, MatrixRenderer, RecordingCanvas};
pub use text::TextRenderer;

/// Something that can show a departure board.
pub trait Renderer {
    fn render(&mut self, board: &GroupedDepartures) -> io::Result<()>;
}

/// Discards every board.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _board: &GroupedDepartures) -> io::Result<()> {
        Ok(())
    }
}
