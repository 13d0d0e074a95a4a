use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Background image prepared for one canvas: already scaled to the canvas bounds, premultiplied
/// RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode background image bytes and scale them to exactly fill `canvas`.
///
/// SVG documents are rasterized at the canvas size; everything else goes through the `image`
/// decoders and is resized once here so per-frame drawing is a plain blit.
pub fn decode_background(bytes: &[u8], canvas: Canvas) -> CountdownResult<PreparedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        let rgba8_premul = rasterize_svg_to_premul_rgba8(&tree, canvas.width, canvas.height)?;
        return Ok(PreparedImage {
            width: canvas.width,
            height: canvas.height,
            rgba8_premul: Arc::new(rgba8_premul),
        });
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CountdownError::asset(format!("decode background image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let scaled = if rgba.dimensions() == (canvas.width, canvas.height) {
        rgba
    } else {
        image::imageops::resize(&rgba, canvas.width, canvas.height, FilterType::Triangle)
    };

    let mut rgba8_premul = scaled.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width: canvas.width,
        height: canvas.height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes with system fonts available for `<text>` nodes.
pub fn parse_svg(bytes: &[u8]) -> CountdownResult<usvg::Tree> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    let opts = usvg::Options {
        fontdb: Arc::new(fontdb),
        ..Default::default()
    };
    usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| CountdownError::asset(format!("parse svg background: {e}")))
}

/// Rasterize `tree` stretched to `width` x `height`.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> CountdownResult<Vec<u8>> {
    let size = tree.size();
    if !size.width().is_finite() || size.width() <= 0.0 || !size.height().is_finite() {
        return Err(CountdownError::asset("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CountdownError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = &head[start..];
    head.starts_with(b"<svg")
        || (head.starts_with(b"<?xml") && head.windows(4).any(|w| w == b"<svg"))
        || (head.starts_with(b"<!--") && head.windows(4).any(|w| w == b"<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
