//! Splitting input text into words.

use std::{fs, io, path::{Path, PathBuf}};

use thiserror::Error;
use tracing::warn;

/// Longest word, in bytes, that will be laid out. Longer tokens are skipped.
pub const MAX_WORD_LEN: usize = 99;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("unable to open text file {}", .path.display())]
    UnknownSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A token too long to lay out. Recovered by skipping the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("word of {len} bytes exceeds the {max}-byte limit")]
pub struct WordTooLong {
    pub len: usize,
    pub max: usize,
}

/// Accept `word` if it is at most [`MAX_WORD_LEN`] bytes long.
pub fn check_word(word: &str) -> Result<&str, WordTooLong> {
    if word.len() > MAX_WORD_LEN {
        return Err(WordTooLong {
            len: word.len(),
            max: MAX_WORD_LEN,
        });
    }
    Ok(word)
}

/// Whitespace-delimited words of `text`, skipping any that are too long.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_ascii_whitespace()
        .filter_map(|word| match check_word(word) {
            Ok(word) => Some(word),
            Err(err) => {
                warn!(%err, "skipping word");
                None
            }
        })
}

/// Text to be written, read up front from a file.
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextSourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TextSourceError::UnknownSource {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self { text })
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        split_words(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_whitespace() {
        let words: Vec<_> = split_words("  Hello\tworld\n\nagain ").collect();
        assert_eq!(words, ["Hello", "world", "again"]);
    }

    #[test]
    fn empty_text_has_no_words() {
        assert_eq!(split_words(" \n\t ").count(), 0);
    }

    #[test]
    fn long_words_are_skipped() {
        let long = "x".repeat(MAX_WORD_LEN + 1);
        let limit = "y".repeat(MAX_WORD_LEN);
        let text = format!("before {long} {limit} after");

        let words: Vec<_> = split_words(&text).collect();
        assert_eq!(words, ["before", limit.as_str(), "after"]);
        assert_eq!(
            check_word(&long),
            Err(WordTooLong { len: 100, max: 99 })
        );
    }

    #[test]
    fn missing_file_is_unknown_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextSource::open(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, TextSourceError::UnknownSource { .. }));
    }

    #[test]
    fn reads_words_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.txt");
        fs::write(&path, "Hello robot\n").unwrap();

        let source = TextSource::open(&path).unwrap();
        assert_eq!(source.words().collect::<Vec<_>>(), ["Hello", "robot"]);
    }
}
