use std::path::PathBuf;

use crate::assets::font::FontSource;

/// Environment variable overriding [`GeneratorSettings::output_dir`].
pub const ENV_OUT_DIR: &str = "COUNTDOWN_GIF_OUT_DIR";
/// Environment variable pointing [`GeneratorSettings::font`] at a font file.
pub const ENV_FONT: &str = "COUNTDOWN_GIF_FONT";

/// Process-level generator configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Directory GIFs are written into. Created on demand.
    pub output_dir: PathBuf,
    /// Font used for countdown text.
    pub font: FontSource,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("tmp"),
            font: FontSource::System,
        }
    }
}

impl GeneratorSettings {
    /// Defaults overridden by `COUNTDOWN_GIF_OUT_DIR` and `COUNTDOWN_GIF_FONT` when set and
    /// non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(dir) = lookup(ENV_OUT_DIR).filter(|v| !v.trim().is_empty()) {
            settings.output_dir = PathBuf::from(dir);
        }
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            settings.font = FontSource::File(PathBuf::from(font));
        }
        settings
    }

    /// Replace the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the font source.
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/settings.rs"]
mod tests;
