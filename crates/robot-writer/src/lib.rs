//! `robot-writer` turns plain text into motion for a pen-plotting robot.
//!
//! Text is split into words, laid out on fixed-width lines in a
//! single-stroke font, and converted to a lazy stream of pen-up/pen-down
//! moves. Those moves are sent to the robot as G-code, one acknowledged
//! command at a time.
//!
//! ```
//! use robot_writer::{plot, LayoutConfig, MotionCommand, StrokeFont};
//!
//! let font = StrokeFont::parse("999 65 3\n0 0 0\n9 18 1\n18 0 1\n").unwrap();
//! let config = LayoutConfig::for_height(5.0).unwrap();
//!
//! let mut commands: Vec<MotionCommand> = Vec::new();
//! plot(&font, "A A", config, &mut commands).unwrap();
//! assert_eq!(commands.len(), 7);
//! ```

pub mod config;
pub mod emitter;
pub mod gcode;
pub mod layout;
pub mod preview;
pub mod words;

pub use config::{ConfigError, LayoutConfig};
pub use emitter::{EmitError, EmitterConfig, GcodeWriter, MotionEmitter, SerialEmitter, drive};
pub use layout::{Layout, LayoutEngine, LayoutState, layout};
pub use robot_writer_core::{Glyph, GlyphTable, MotionCommand, PenState, Position, Stroke};
pub use robot_writer_font::{FontError, StrokeFont};
pub use words::{TextSource, TextSourceError, WordTooLong, split_words};

/// Lay out `text` in `font` and hand every resulting command to `emitter`.
///
/// Returns the number of commands emitted.
pub fn plot<F, E>(font: &F, text: &str, config: LayoutConfig, emitter: &mut E) -> Result<usize, E::Error>
where
    F: GlyphTable + ?Sized,
    E: MotionEmitter + ?Sized,
{
    drive(layout(font, split_words(text), config), emitter)
}
