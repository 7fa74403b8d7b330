//! Placing words on lines and turning glyph strokes into motion commands.
//!
//! Layout is a single forward pass. Words are taken from the input one at a
//! time, measured, wrapped onto a new line if they would run past the line
//! width, and their strokes translated to absolute page positions. The
//! resulting [`Layout`] is a lazy iterator; a caller that wants to stop early
//! simply stops pulling from it.

use std::{collections::VecDeque, iter::FusedIterator};

use robot_writer_core::{GlyphTable, MotionCommand, PenState, Position};
use tracing::{info, trace};

use crate::config::LayoutConfig;

/// Cursor of a layout pass, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutState {
    /// Horizontal extent of the current line used so far.
    pub cursor_x: f32,
    /// Baseline of the current line. Starts one line height below the
    /// origin and decreases by a line height on every wrap.
    pub baseline_y: f32,
}

impl LayoutState {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            cursor_x: 0.0,
            baseline_y: -config.line_height(),
        }
    }

    fn wrap(&mut self, config: &LayoutConfig) {
        self.baseline_y -= config.line_height();
        self.cursor_x = 0.0;
    }
}

/// Lays out words in a font according to a [`LayoutConfig`].
#[derive(Debug)]
pub struct LayoutEngine<'f, F: ?Sized> {
    font: &'f F,
    config: LayoutConfig,
}

impl<'f, F: GlyphTable + ?Sized> LayoutEngine<'f, F> {
    pub fn new(font: &'f F, config: LayoutConfig) -> Self {
        Self { font, config }
    }

    /// Horizontal space `word` occupies, including each character's spacing
    /// but not the trailing word spacing.
    pub fn word_width(&self, word: &str) -> f32 {
        word_width(self.font, &self.config, word)
    }

    /// Lay out `words` in order, starting a fresh cursor.
    pub fn layout<I>(&self, words: I) -> Layout<'f, F, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Layout {
            font: self.font,
            config: self.config,
            words: words.into_iter(),
            state: LayoutState::new(&self.config),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

/// Lay out `words` in `font`, yielding motion commands lazily.
///
/// ```
/// use robot_writer::{layout, LayoutConfig, StrokeFont};
///
/// let font = StrokeFont::parse("999 65 3\n0 0 0\n9 18 1\n18 0 1\n").unwrap();
/// let config = LayoutConfig::for_height(5.0).unwrap();
/// let commands: Vec<_> = layout(&font, ["A"], config).collect();
///
/// assert_eq!(commands.len(), 4);
/// ```
pub fn layout<'f, F, I>(font: &'f F, words: I, config: LayoutConfig) -> Layout<'f, F, I::IntoIter>
where
    F: GlyphTable + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    LayoutEngine::new(font, config).layout(words)
}

/// Lazy sequence of motion commands for a run of words.
///
/// Ends with a pen-up move back to the origin once the words are exhausted.
#[derive(Debug)]
pub struct Layout<'f, F: ?Sized, I> {
    font: &'f F,
    config: LayoutConfig,
    words: I,
    state: LayoutState,
    pending: VecDeque<MotionCommand>,
    finished: bool,
}

impl<F, I> Layout<'_, F, I>
where
    F: GlyphTable + ?Sized,
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Cursor after the words consumed so far.
    pub fn state(&self) -> LayoutState {
        self.state
    }

    fn place_word(&mut self, word: &str) {
        let scale = self.config.scale;
        let width = word_width(self.font, &self.config, word);

        // The first word on a line is placed even if it alone is too wide.
        if self.state.cursor_x > 0.0 && self.state.cursor_x + width > self.config.line_width_mm {
            self.state.wrap(&self.config);
            info!(word, baseline_y = self.state.baseline_y, "wrapped to new line");
        }

        trace!(word, x = self.state.cursor_x, y = self.state.baseline_y, width, "placing word");

        for character in word.chars() {
            let glyph = ascii_code(character).and_then(|code| self.font.glyph(code));

            if let Some(glyph) = glyph {
                for stroke in &glyph.strokes {
                    let to = Position::new(
                        stroke.x * scale + self.state.cursor_x,
                        stroke.y * scale + self.state.baseline_y,
                    );
                    self.pending.push_back(match stroke.pen {
                        PenState::Down => MotionCommand::draw(to),
                        PenState::Up => MotionCommand::travel(to),
                    });
                }
            }

            let advance = glyph.map_or(0.0, |glyph| glyph.advance_width());
            self.state.cursor_x += (advance + self.config.char_spacing_mm) * scale;
        }

        self.state.cursor_x += self.config.word_spacing_mm * scale;
    }
}

impl<F, I> Iterator for Layout<'_, F, I>
where
    F: GlyphTable + ?Sized,
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = MotionCommand;

    fn next(&mut self) -> Option<MotionCommand> {
        loop {
            if let Some(command) = self.pending.pop_front() {
                return Some(command);
            }
            if self.finished {
                return None;
            }

            match self.words.next() {
                Some(word) => self.place_word(word.as_ref()),
                None => {
                    self.finished = true;
                    self.pending.push_back(MotionCommand::home());
                }
            }
        }
    }
}

impl<F, I> FusedIterator for Layout<'_, F, I>
where
    F: GlyphTable + ?Sized,
    I: Iterator,
    I::Item: AsRef<str>,
{
}

fn ascii_code(character: char) -> Option<u8> {
    character.is_ascii().then_some(character as u8)
}

fn word_width<F: GlyphTable + ?Sized>(font: &F, config: &LayoutConfig, word: &str) -> f32 {
    word.chars()
        .map(|character| {
            let advance = ascii_code(character).map_or(0.0, |code| font.advance_width(code));
            (advance + config.char_spacing_mm) * config.scale
        })
        .sum()
}
