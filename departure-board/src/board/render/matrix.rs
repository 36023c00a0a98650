//! LED matrix layout.
//!
//! The board is drawn as text rows onto a [`Canvas`]: a station header
//! followed by its departures, each row one font height tall, until the
//! panel is full. Hardware drivers implement `Canvas`; [`RecordingCanvas`]
//! stands in for a panel in tests and on development machines.

use std::io;

use crate::board::group::GroupedDepartures;
use crate::domain::{Countdown, DepartureEntry};

use super::Renderer;

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const AMBER: Color = Color::new(255, 160, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREEN: Color = Color::new(0, 200, 0);
    pub const GREY: Color = Color::new(90, 90, 90);
}

/// Metrics of a monospace bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub name: String,
    pub height: u32,
    pub baseline: u32,
}

impl Font {
    /// Metrics for a BDF font by file name (`4x6.bdf`, `5x7.bdf`, `tom-thumb.bdf`, ...).
    ///
    /// Unknown fonts get 8px rows with the baseline at 7.
    pub fn named(name: &str) -> Self {
        let (height, baseline) = if name.contains("4x6") {
            (6, 5)
        } else if name.contains("5x7") {
            (7, 6)
        } else if name.contains("tom-thumb") {
            (5, 4)
        } else {
            (8, 7)
        };
        Self {
            name: name.to_string(),
            height,
            baseline,
        }
    }

    pub fn char_width(&self) -> u32 {
        (self.height / 2).max(1)
    }

    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.char_width()
    }

    /// Longest prefix of `text` that fits in `max_width` pixels.
    pub fn fit<'t>(&self, text: &'t str, max_width: u32) -> &'t str {
        let max_chars = (max_width / self.char_width()) as usize;
        match text.char_indices().nth(max_chars) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

/// A pixel panel that can draw text.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    /// Draw `text` with its baseline at `y`; returns the advance in pixels.
    fn draw_text(&mut self, font: &Font, x: u32, y: u32, color: Color, text: &str) -> u32;
    /// Present the drawn frame.
    fn swap(&mut self);
}

/// A drawing call captured by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear,
    Text {
        x: u32,
        y: u32,
        color: Color,
        text: String,
    },
}

/// Canvas that records draw calls instead of lighting pixels.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    pub ops: Vec<DrawOp>,
    pub frames: usize,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            frames: 0,
        }
    }

    /// Text drawn since the last clear, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == DrawOp::Clear)
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Clear => None,
            })
            .collect()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(64, 32)
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_text(&mut self, font: &Font, x: u32, y: u32, color: Color, text: &str) -> u32 {
        self.ops.push(DrawOp::Text {
            x,
            y,
            color,
            text: text.to_string(),
        });
        font.text_width(text)
    }

    fn swap(&mut self) {
        self.frames += 1;
    }
}

/// Short countdown label for narrow panels.
fn compact_countdown(countdown: Countdown) -> String {
    match countdown {
        Countdown::Now => "now".to_string(),
        Countdown::Minutes(n) => format!("{n}m"),
    }
}

/// Lays out grouped departures on a [`Canvas`].
pub struct MatrixRenderer<C> {
    canvas: C,
    font: Font,
}

impl<C: Canvas> MatrixRenderer<C> {
    pub fn new(canvas: C, font: Font) -> Self {
        Self { canvas, font }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    fn draw_departure(&mut self, departure: &DepartureEntry, top: u32) {
        let font = &self.font;
        let width = self.canvas.width();
        let gap = font.char_width();
        let y = top + font.baseline;

        let countdown = compact_countdown(departure.countdown());
        let countdown_x = width.saturating_sub(font.text_width(&countdown));
        let countdown_color = match departure.countdown() {
            Countdown::Now => Color::AMBER,
            Countdown::Minutes(_) => Color::GREEN,
        };

        let line = font.fit(&departure.line_name, countdown_x);
        let line_width = self.canvas.draw_text(font, 0, y, Color::WHITE, line);

        let direction_x = line_width + gap;
        let direction_room = countdown_x.saturating_sub(direction_x + gap);
        let direction = font.fit(&departure.direction, direction_room);
        if !direction.is_empty() {
            self.canvas
                .draw_text(font, direction_x, y, Color::WHITE, direction);
        }

        self.canvas
            .draw_text(font, countdown_x, y, countdown_color, &countdown);
    }
}

impl<C: Canvas> Renderer for MatrixRenderer<C> {
    fn render(&mut self, board: &GroupedDepartures) -> io::Result<()> {
        self.canvas.clear();

        let row = self.font.height;
        let height = self.canvas.height();
        let width = self.canvas.width();
        let mut top = 0;

        'stations: for group in board {
            if top + row > height {
                break;
            }
            let header = self.font.fit(group.station.display_name(), width);
            self.canvas
                .draw_text(&self.font, 0, top + self.font.baseline, Color::AMBER, header);
            top += row;

            if group.departures.is_empty() {
                if top + row > height {
                    break;
                }
                self.canvas
                    .draw_text(&self.font, 0, top + self.font.baseline, Color::GREY, "-");
                top += row;
            }

            for departure in &group.departures {
                if top + row > height {
                    break 'stations;
                }
                self.draw_departure(departure, top);
                top += row;
            }
        }

        self.canvas.swap();
        Ok(())
    }
}
