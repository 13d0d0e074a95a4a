use crate::assets::color::Rgba8;
use crate::foundation::core::Canvas;

/// Visual parameters shared by every frame of one countdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStyle {
    /// Output canvas.
    pub canvas: Canvas,
    /// Solid fill painted first on every frame.
    pub background: Rgba8,
    /// Countdown text color.
    pub text_color: Rgba8,
    /// Text size in pixels.
    pub font_size_px: f32,
}

impl FrameStyle {
    /// Style with the font sized to the canvas width: `floor(width / 12)` pixels.
    pub fn new(canvas: Canvas, background: Rgba8, text_color: Rgba8) -> Self {
        Self {
            canvas,
            background,
            text_color,
            font_size_px: font_size_for_width(canvas.width),
        }
    }
}

/// Text size used for a canvas `width` pixels wide.
pub fn font_size_for_width(width: u32) -> f32 {
    (width / 12) as f32
}
