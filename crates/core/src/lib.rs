#![no_std]

//! `robot-writer-core` provides core primitives for the `robot-writer` crate.

use alloc::vec::Vec;

extern crate alloc;

/// Height of a character in font design units.
///
/// Fonts for the writing robot are drawn on an 18-unit cap height, and the
/// scaling factor is derived by dividing the desired height by this value.
pub const DESIGN_HEIGHT: f32 = 18.0;

/// Highest character code a font may define. Fonts are indexed by single-byte ASCII.
pub const MAX_CHARACTER_CODE: u8 = 127;

/// A single waypoint within a glyph, in font design units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    /// X coordinate of this point
    pub x: f32,
    /// Y coordinate of this point
    pub y: f32,
    /// Should a line be drawn (i.e., "pen down") when moving to this point?
    pub pen: PenState,
}

/// A single glyph (character) contained within a font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glyph {
    /// Series of points which make up this glyph
    pub strokes: Vec<Stroke>,
}

impl Glyph {
    /// Horizontal distance reserved for this glyph, in design units.
    ///
    /// By convention this is the X coordinate of the final stroke; a glyph
    /// without strokes has no advance.
    pub fn advance_width(&self) -> f32 {
        self.strokes.last().map_or(0.0, |stroke| stroke.x)
    }
}

/// Whether the pen touches the paper.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PenState {
    Up,
    Down,
}

impl PenState {
    pub fn is_down(self) -> bool {
        matches!(self, PenState::Down)
    }
}

/// Absolute position on the page, in millimetres.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One atomic motion instruction: set the pen state, then move to `to`.
///
/// The pen state always takes effect before the move, so a pen-down command
/// draws a line from the previous position and a pen-up command repositions
/// without drawing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotionCommand {
    pub pen: PenState,
    pub to: Position,
}

impl MotionCommand {
    /// Lift the pen and travel to `to`.
    pub fn travel(to: Position) -> Self {
        Self {
            pen: PenState::Up,
            to,
        }
    }

    /// Lower the pen and draw a line to `to`.
    pub fn draw(to: Position) -> Self {
        Self {
            pen: PenState::Down,
            to,
        }
    }

    /// Lift the pen and return to the origin.
    pub fn home() -> Self {
        Self::travel(Position::ORIGIN)
    }
}

/// Lookup of glyphs by character code.
///
/// Implementors may store their glyphs however they like; layout only needs
/// read access by code.
pub trait GlyphTable {
    /// The glyph defined for `code`, or `None` if the font leaves it undefined.
    fn glyph(&self, code: u8) -> Option<&Glyph>;

    /// Advance width of `code` in design units; undefined glyphs advance by zero.
    fn advance_width(&self, code: u8) -> f32 {
        self.glyph(code).map_or(0.0, Glyph::advance_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn advance_width_is_last_stroke_x() {
        let glyph = Glyph {
            strokes: vec![
                Stroke { x: 0.0, y: 0.0, pen: PenState::Up },
                Stroke { x: 9.0, y: 18.0, pen: PenState::Down },
                Stroke { x: 14.0, y: 0.0, pen: PenState::Down },
            ],
        };
        assert_eq!(glyph.advance_width(), 14.0);
    }

    #[test]
    fn empty_glyph_has_no_advance() {
        assert_eq!(Glyph::default().advance_width(), 0.0);
    }

    #[test]
    fn home_lifts_pen_at_origin() {
        let home = MotionCommand::home();
        assert!(!home.pen.is_down());
        assert_eq!(home.to, Position::ORIGIN);
    }
}
