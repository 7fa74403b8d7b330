use std::{io, path::PathBuf};

use thiserror::Error;

/// Reasons a font description cannot be loaded.
#[derive(Debug, Error)]
pub enum FontError {
    /// A `999 <code> <count>` record is not two integers, or the code is out of range.
    #[error("line {line}: malformed glyph header: {reason}")]
    MalformedHeader { line: usize, reason: String },

    /// A stroke record is unparsable, orphaned, or exceeds its glyph's declared count.
    #[error("line {line}: malformed stroke: {reason}")]
    MalformedStroke { line: usize, reason: String },

    /// The font source could not be opened or read.
    #[error("unable to read font source {}", .path.display())]
    UnknownSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FontError {
    pub(crate) fn header(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn stroke(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedStroke {
            line,
            reason: reason.into(),
        }
    }
}
