use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::assets::color::Rgba8;
use crate::foundation::core::{Canvas, MAX_FRAMES, MIN_FRAMES, clamp_to_u32};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::time::resolver::parse_target_time;

/// Default canvas width.
pub const DEFAULT_WIDTH: i64 = 200;
/// Default canvas height.
pub const DEFAULT_HEIGHT: i64 = 200;
/// Default text color.
pub const DEFAULT_TEXT_COLOR: &str = "ffffff";
/// Default background color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "000000";
/// Default output name.
pub const DEFAULT_NAME: &str = "default";
/// Default frame count.
pub const DEFAULT_FRAMES: i64 = 30;

/// Countdown generation parameters as received from a caller.
///
/// Every field except `time` is optional. Numeric fields accept JSON numbers or numeric strings
/// (query-string values), and out-of-range values are clamped rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Target instant, e.g. `2030-01-01T00:00:00Z`.
    #[serde(default)]
    pub time: Option<String>,
    /// Canvas width in pixels.
    #[serde(default, deserialize_with = "lenient_int::deserialize")]
    pub width: Option<i64>,
    /// Canvas height in pixels.
    #[serde(default, deserialize_with = "lenient_int::deserialize")]
    pub height: Option<i64>,
    /// Text color as a hex triplet.
    #[serde(default)]
    pub color: Option<String>,
    /// Background color as a hex triplet.
    #[serde(default)]
    pub bg: Option<String>,
    /// Output file stem.
    #[serde(default)]
    pub name: Option<String>,
    /// Image drawn over the background color, scaled to the canvas.
    #[serde(default)]
    pub background_image: Option<PathBuf>,
    /// Number of frames (seconds) to render.
    #[serde(default, deserialize_with = "lenient_int::deserialize")]
    pub frames: Option<i64>,
}

impl GenerationRequest {
    /// Request counting down to `time` with every other field defaulted.
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: Some(time.into()),
            ..Self::default()
        }
    }

    /// Parse a request from a JSON document.
    pub fn from_json(json: &str) -> CountdownResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CountdownError::validation(format!("invalid request json: {e}")))
    }

    /// Set the canvas size.
    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set text and background colors.
    pub fn with_colors(mut self, color: impl Into<String>, bg: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self.bg = Some(bg.into());
        self
    }

    /// Set the output file stem.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the background image path.
    pub fn with_background_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_image = Some(path.into());
        self
    }

    /// Set the frame count.
    pub fn with_frames(mut self, frames: i64) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Apply defaults and bounds, producing the immutable configuration for one generation.
    ///
    /// A missing or unparseable `time` is a [`CountdownError::Time`]. Nothing else is rejected.
    pub fn resolve(&self) -> CountdownResult<GenerationConfig> {
        let time = self
            .time
            .as_deref()
            .ok_or_else(|| CountdownError::time("target time is required"))?;
        let target = parse_target_time(time)?;

        let canvas = Canvas::clamped(
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        );
        let frames = clamp_to_u32(self.frames.unwrap_or(DEFAULT_FRAMES), MIN_FRAMES, MAX_FRAMES);

        let default_text = Rgba8::from_hex_or(DEFAULT_TEXT_COLOR, Rgba8::WHITE);
        let default_bg = Rgba8::from_hex_or(DEFAULT_BACKGROUND_COLOR, Rgba8::BLACK);
        let text_color = self
            .color
            .as_deref()
            .map_or(default_text, |c| Rgba8::from_hex_or(c, default_text));
        let background = self
            .bg
            .as_deref()
            .map_or(default_bg, |c| Rgba8::from_hex_or(c, default_bg));

        Ok(GenerationConfig {
            target,
            canvas,
            text_color,
            background,
            name: self.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            background_image: self.background_image.clone(),
            frames,
        })
    }
}

/// Fully resolved parameters for one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Countdown target.
    pub target: DateTime<Utc>,
    /// Canvas, clamped to `[150, 500]` on each axis.
    pub canvas: Canvas,
    /// Text color.
    pub text_color: Rgba8,
    /// Background fill.
    pub background: Rgba8,
    /// Output file stem. Used as given.
    pub name: String,
    /// Optional background image.
    pub background_image: Option<PathBuf>,
    /// Frame count, clamped to `[1, 90]`.
    pub frames: u32,
}

impl GenerationConfig {
    /// File name of the output inside the output directory.
    pub fn file_name(&self) -> String {
        format!("{}.gif", self.name)
    }
}

mod lenient_int {
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(de: D) -> Result<Option<i64>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(de)?;
        Ok(match raw {
            None => None,
            Some(Raw::Int(v)) => Some(v),
            Some(Raw::Float(v)) if v.is_finite() => Some(v.trunc() as i64),
            Some(Raw::Float(_)) => None,
            Some(Raw::Text(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v.trunc() as i64),
                _ => {
                    tracing::warn!(value = %s, "non-numeric request value, using default");
                    None
                }
            },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/request.rs"]
mod tests;
