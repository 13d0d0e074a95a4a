use crate::foundation::error::{CountdownError, CountdownResult};

/// Smallest accepted canvas edge in pixels.
pub const MIN_CANVAS_PX: u32 = 150;
/// Largest accepted canvas edge in pixels.
pub const MAX_CANVAS_PX: u32 = 500;
/// Smallest accepted frame count.
pub const MIN_FRAMES: u32 = 1;
/// Largest accepted frame count.
pub const MAX_FRAMES: u32 = 90;

/// Bound `v` to `[lo, hi]`: `max(lo, min(v, hi))`.
pub fn clamp<T: Ord>(v: T, lo: T, hi: T) -> T {
    std::cmp::max(lo, std::cmp::min(v, hi))
}

/// Clamp a signed request value into an unsigned `[lo, hi]` range.
pub(crate) fn clamp_to_u32(v: i64, lo: u32, hi: u32) -> u32 {
    clamp(v, i64::from(lo), i64::from(hi)) as u32
}

/// 0-based index of a frame in display order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas with non-zero dimensions that fit the rasterizer (`u16`).
    pub fn new(width: u32, height: u32) -> CountdownResult<Self> {
        if width == 0 || height == 0 {
            return Err(CountdownError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(CountdownError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(Self { width, height })
    }

    /// Canvas built from raw request values, each clamped to
    /// `[MIN_CANVAS_PX, MAX_CANVAS_PX]`.
    pub fn clamped(width: i64, height: i64) -> Self {
        Self {
            width: clamp_to_u32(width, MIN_CANVAS_PX, MAX_CANVAS_PX),
            height: clamp_to_u32(height, MIN_CANVAS_PX, MAX_CANVAS_PX),
        }
    }

    /// Horizontal text anchor.
    pub fn half_width(self) -> f64 {
        f64::from(self.width) / 2.0
    }

    /// Vertical text anchor.
    pub fn half_height(self) -> f64 {
        f64::from(self.height) / 2.0
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
