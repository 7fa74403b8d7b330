//! Layout settings.
//!
//! Defaults match the writing robot's page: a 100 mm line, half a millimetre
//! between letters and seven between words. A JSON settings file may override
//! any of these, and the command line overrides the file.

use std::{fs, io, path::{Path, PathBuf}};

use robot_writer_core::DESIGN_HEIGHT;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Smallest character height the robot can write legibly, in millimetres.
pub const MIN_HEIGHT_MM: f32 = 4.0;
/// Largest character height that fits the robot's drawable region, in millimetres.
pub const MAX_HEIGHT_MM: f32 = 10.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("character height {height} mm is outside {}..={} mm", MIN_HEIGHT_MM, MAX_HEIGHT_MM)]
    HeightOutOfRange { height: f32 },

    #[error("unable to read settings file {}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parameters of a layout pass.
///
/// Spacing values are multiplied by `scale` along with the glyph geometry, so
/// they are effectively expressed in design units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Millimetres per font design unit. Derived from the character height.
    #[serde(skip)]
    pub scale: f32,
    /// Width a word may not run past when it starts a new placement.
    pub line_width_mm: f32,
    /// Gap added after every character.
    pub char_spacing_mm: f32,
    /// Gap added after every word, on top of its last character's spacing.
    pub word_spacing_mm: f32,
    /// Vertical gap between the bottom of one line and the top of the next.
    pub line_gap_mm: f32,
    /// Font design units per character height. Fixed by the font data.
    #[serde(skip)]
    pub design_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            line_width_mm: 100.0,
            char_spacing_mm: 0.5,
            word_spacing_mm: 7.0,
            line_gap_mm: 5.0,
            design_height: DESIGN_HEIGHT,
        }
    }
}

impl LayoutConfig {
    /// Default settings scaled so characters are `height_mm` tall.
    pub fn for_height(height_mm: f32) -> Result<Self, ConfigError> {
        Self::default().with_height(height_mm)
    }

    /// Rescale for characters `height_mm` tall, which must lie within
    /// [`MIN_HEIGHT_MM`]..=[`MAX_HEIGHT_MM`].
    pub fn with_height(self, height_mm: f32) -> Result<Self, ConfigError> {
        if !(MIN_HEIGHT_MM..=MAX_HEIGHT_MM).contains(&height_mm) {
            return Err(ConfigError::HeightOutOfRange { height: height_mm });
        }

        Ok(Self {
            scale: height_mm / self.design_height,
            ..self
        })
    }

    /// Distance between successive baselines.
    pub fn line_height(&self) -> f32 {
        self.scale * self.design_height + self.line_gap_mm
    }

    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_owned(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

        debug!(path = %path.display(), ?config, "loaded layout settings");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn height_sets_scale() {
        let config = LayoutConfig::for_height(9.0).unwrap();
        assert_eq!(config.scale, 0.5);
        assert_eq!(config.line_height(), 14.0);
    }

    #[test]
    fn height_bounds_are_inclusive() {
        assert!(LayoutConfig::for_height(4.0).is_ok());
        assert!(LayoutConfig::for_height(10.0).is_ok());
        assert!(matches!(
            LayoutConfig::for_height(3.9),
            Err(ConfigError::HeightOutOfRange { .. })
        ));
        assert!(LayoutConfig::for_height(10.5).is_err());
        assert!(LayoutConfig::for_height(f32::NAN).is_err());
    }

    #[test]
    fn settings_file_overrides_some_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "line_width_mm": 150.0, "word_spacing_mm": 4.0 }}"#).unwrap();

        let config = LayoutConfig::from_file(file.path()).unwrap();
        assert_eq!(config.line_width_mm, 150.0);
        assert_eq!(config.word_spacing_mm, 4.0);
        assert_eq!(config.char_spacing_mm, 0.5);
    }

    #[test]
    fn settings_file_cannot_change_design_height() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "design_height": 36.0, "line_gap_mm": 2.0 }}"#).unwrap();

        let config = LayoutConfig::from_file(file.path()).unwrap();
        assert_eq!(config.design_height, DESIGN_HEIGHT);
        assert_eq!(config.line_gap_mm, 2.0);

        let config = config.with_height(9.0).unwrap();
        assert_eq!(config.scale, 0.5);
        assert_eq!(config.line_height(), 11.0);
    }

    #[test]
    fn invalid_settings_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "line_width_mm = 3").unwrap();

        assert!(matches!(
            LayoutConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
