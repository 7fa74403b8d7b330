//! `robot-writer-font` loads the single-stroke font used by the writing robot.
//!
//! The font description is line oriented. A header line `999 <code> <count>`
//! starts a glyph for the ASCII character `code` and is followed by exactly
//! `count` stroke lines of the form `<x> <y> <pen>`, where `pen` is `1` to
//! draw to the point and `0` to travel to it with the pen lifted:
//!
//! ```text
//! 999 65 3
//! 0 0 0
//! 9 18 1
//! 18 0 1
//! ```
//!
//! ```
//! use robot_writer_font::StrokeFont;
//! use robot_writer_core::GlyphTable;
//!
//! let font = StrokeFont::parse("999 65 3\n0 0 0\n9 18 1\n18 0 1\n").unwrap();
//! assert_eq!(font.advance_width(b'A'), 18.0);
//! ```

mod error;

use std::{collections::BTreeMap, fmt, fs, path::Path};

pub use error::FontError;
use robot_writer_core::{Glyph, GlyphTable, MAX_CHARACTER_CODE, PenState, Stroke};
use tracing::{debug, info};

/// Token which marks a glyph header line.
const HEADER_MARKER: &str = "999";

/// An immutable table of glyphs keyed by character code.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeFont {
    glyphs: BTreeMap<u8, Glyph>,
}

/// The glyph currently being filled from stroke lines.
struct PendingGlyph {
    code: u8,
    declared: usize,
    glyph: Glyph,
}

impl PendingGlyph {
    fn remaining(&self) -> usize {
        self.declared - self.glyph.strokes.len()
    }
}

impl StrokeFont {
    /// Read and parse the font description at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| FontError::UnknownSource {
            path: path.to_owned(),
            source,
        })?;

        let font = Self::parse(&source)?;
        info!(path = %path.display(), glyphs = font.len(), "loaded stroke font");
        Ok(font)
    }

    /// Parse a font description held in memory.
    pub fn parse(source: &str) -> Result<Self, FontError> {
        let mut glyphs = BTreeMap::new();
        let mut pending: Option<PendingGlyph> = None;
        let mut last_line = 0;

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx + 1;
            last_line = line_no;

            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.first() {
                None => continue,
                Some(&HEADER_MARKER) => {
                    if let Some(done) = pending.take() {
                        finish(done, line_no, &mut glyphs)?;
                    }
                    pending = Some(parse_header(&fields[1..], line_no)?);
                }
                Some(_) => {
                    let Some(active) = pending.as_mut() else {
                        return Err(FontError::stroke(line_no, "stroke appears before any glyph header"));
                    };
                    if active.remaining() == 0 {
                        return Err(FontError::stroke(
                            line_no,
                            format!(
                                "glyph {} declares {} strokes but more follow",
                                active.code, active.declared
                            ),
                        ));
                    }
                    active.glyph.strokes.push(parse_stroke(&fields, line_no)?);
                }
            }
        }

        if let Some(done) = pending.take() {
            finish(done, last_line + 1, &mut glyphs)?;
        }

        Ok(Self { glyphs })
    }

    /// Number of glyphs defined by the font.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Defined glyphs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Glyph)> {
        self.glyphs.iter().map(|(code, glyph)| (*code, glyph))
    }
}

impl GlyphTable for StrokeFont {
    fn glyph(&self, code: u8) -> Option<&Glyph> {
        self.glyphs.get(&code)
    }
}

/// Serializes the font back into its description format.
impl fmt::Display for StrokeFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, glyph) in self.iter() {
            writeln!(f, "{HEADER_MARKER} {code} {}", glyph.strokes.len())?;
            for stroke in &glyph.strokes {
                let pen = if stroke.pen.is_down() { 1 } else { 0 };
                writeln!(f, "{} {} {pen}", stroke.x, stroke.y)?;
            }
        }
        Ok(())
    }
}

fn finish(
    done: PendingGlyph,
    line: usize,
    glyphs: &mut BTreeMap<u8, Glyph>,
) -> Result<(), FontError> {
    if done.remaining() > 0 {
        return Err(FontError::stroke(
            line,
            format!(
                "glyph {} declares {} strokes but only {} were given",
                done.code,
                done.declared,
                done.glyph.strokes.len()
            ),
        ));
    }

    debug!(code = done.code, strokes = done.declared, "parsed glyph");
    // A repeated header replaces the earlier definition.
    glyphs.insert(done.code, done.glyph);
    Ok(())
}

fn parse_header(fields: &[&str], line: usize) -> Result<PendingGlyph, FontError> {
    let [code, count] = fields else {
        return Err(FontError::header(
            line,
            format!("expected a character code and a stroke count, found {} fields", fields.len()),
        ));
    };

    let code: i64 = code
        .parse()
        .map_err(|_| FontError::header(line, format!("character code {code:?} is not an integer")))?;
    let code = u8::try_from(code)
        .ok()
        .filter(|code| *code <= MAX_CHARACTER_CODE)
        .ok_or_else(|| {
            FontError::header(
                line,
                format!("character code {code} is outside 0..={MAX_CHARACTER_CODE}"),
            )
        })?;

    let declared: usize = count.parse().map_err(|_| {
        FontError::header(line, format!("stroke count {count:?} is not a non-negative integer"))
    })?;

    Ok(PendingGlyph {
        code,
        declared,
        glyph: Glyph {
            strokes: Vec::new(),
        },
    })
}

fn parse_stroke(fields: &[&str], line: usize) -> Result<Stroke, FontError> {
    let [x, y, pen] = fields else {
        return Err(FontError::stroke(
            line,
            format!("expected `<x> <y> <pen>`, found {} fields", fields.len()),
        ));
    };

    let x = parse_coordinate(x, "x", line)?;
    let y = parse_coordinate(y, "y", line)?;
    let pen = match pen.parse::<i32>() {
        Ok(0) => PenState::Up,
        Ok(1) => PenState::Down,
        _ => {
            return Err(FontError::stroke(line, format!("pen state {pen:?} is not 0 or 1")));
        }
    };

    Ok(Stroke { x, y, pen })
}

fn parse_coordinate(field: &str, axis: &str, line: usize) -> Result<f32, FontError> {
    field
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            FontError::stroke(line, format!("{axis} coordinate {field:?} is not a finite number"))
        })
}
