use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::font::{ResolvedFont, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::backend::FrameRGBA;
use crate::render::style::FrameStyle;

/// CPU rasterizer for countdown frames.
///
/// One renderer draws every frame of a request. The `vello_cpu` context, target pixmap, scaled
/// background paint and text shaper are built once in [`FrameRenderer::new`] and reused; each
/// call to [`FrameRenderer::render`] repaints the whole canvas so frames never bleed into each
/// other.
pub struct FrameRenderer {
    style: FrameStyle,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    background: Option<vello_cpu::Image>,
    text: Option<TextPainter>,
}

struct TextPainter {
    engine: TextLayoutEngine,
    bytes: Arc<Vec<u8>>,
    faces: HashMap<u32, vello_cpu::peniko::FontData>,
}

impl TextPainter {
    fn font_data(&mut self, index: u32) -> vello_cpu::peniko::FontData {
        self.faces
            .entry(index)
            .or_insert_with(|| {
                let blob = vello_cpu::peniko::Blob::new(self.bytes.clone());
                vello_cpu::peniko::FontData::new(blob, index)
            })
            .clone()
    }
}

impl FrameRenderer {
    /// Prepare a renderer for `style`.
    ///
    /// `background` must already be scaled to the canvas (see
    /// [`decode_background`](crate::decode_background)). Without a `font` frames are rendered
    /// without text.
    pub fn new(
        style: FrameStyle,
        background: Option<&PreparedImage>,
        font: Option<&ResolvedFont>,
    ) -> CountdownResult<Self> {
        let w: u16 = style
            .canvas
            .width
            .try_into()
            .map_err(|_| CountdownError::render("canvas width exceeds u16"))?;
        let h: u16 = style
            .canvas
            .height
            .try_into()
            .map_err(|_| CountdownError::render("canvas height exceeds u16"))?;

        let background = match background {
            Some(img) => {
                if (img.width, img.height) != (style.canvas.width, style.canvas.height) {
                    return Err(CountdownError::render(format!(
                        "background is {}x{}, canvas is {}x{}",
                        img.width, img.height, style.canvas.width, style.canvas.height
                    )));
                }
                let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
                Some(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                })
            }
            None => None,
        };

        let text = match font {
            Some(font) => {
                let engine = TextLayoutEngine::new(font)?;
                tracing::debug!(
                    family = engine.family_name(),
                    size_px = style.font_size_px,
                    "countdown text enabled"
                );
                Some(TextPainter {
                    engine,
                    bytes: font.bytes.clone(),
                    faces: HashMap::new(),
                })
            }
            None => None,
        };

        Ok(Self {
            style,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            background,
            text,
        })
    }

    /// Whether text is drawn at all (a font was available).
    pub fn draws_text(&self) -> bool {
        self.text.is_some()
    }

    /// Draw one frame showing `text`.
    ///
    /// Paint order is the solid background, then the background image stretched over the full
    /// canvas, then `text` centered on the canvas midpoint.
    pub fn render(&mut self, text: &str) -> CountdownResult<FrameRGBA> {
        let canvas = self.style.canvas;
        let full = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        );

        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_paint(self.style.background.to_peniko());
        ctx.fill_rect(&full);

        if let Some(img) = &self.background {
            ctx.set_paint(img.clone());
            ctx.fill_rect(&full);
        }

        if let Some(painter) = &mut self.text {
            let brush = TextBrushRgba8::from(self.style.text_color);
            let layout = painter
                .engine
                .layout_line(text, self.style.font_size_px, brush)?;

            let x = canvas.half_width() - f64::from(layout.width()) / 2.0;
            let y = canvas.half_height() - f64::from(layout.height()) / 2.0;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let font = painter.font_data(run.run().font().index);
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CountdownResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CountdownError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CountdownError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CountdownError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
