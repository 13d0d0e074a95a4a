use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::color::Rgba8;
use crate::foundation::error::{CountdownError, CountdownResult};

/// Where the countdown font comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FontSource {
    /// Best monospace face installed on the system.
    #[default]
    System,
    /// A `.ttf`/`.otf`/`.ttc` file.
    File(PathBuf),
}

/// Font bytes selected for rendering.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
    /// Family name reported by the font database.
    pub family: String,
}

/// Resolve `source` to font bytes.
///
/// Prefers an upright face flagged monospaced, closest to regular weight. Without one, the
/// generic Monospace, SansSerif and Serif families are queried before falling back to any face.
/// `System` yields `None` when nothing is installed. A `File` that cannot be read or holds no
/// usable face is an asset error.
pub fn resolve_font(source: &FontSource) -> CountdownResult<Option<ResolvedFont>> {
    let mut db = usvg::fontdb::Database::new();
    match source {
        FontSource::System => db.load_system_fonts(),
        FontSource::File(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                CountdownError::asset(format!("read font file '{}': {e}", path.display()))
            })?;
            db.load_font_data(bytes);
            if db.is_empty() {
                return Err(CountdownError::asset(format!(
                    "font file '{}' contains no usable faces",
                    path.display()
                )));
            }
        }
    }

    let Some(id) = monospace_face(&db).or_else(|| generic_face(&db)) else {
        tracing::warn!("no system fonts found; countdown text will not be drawn");
        return Ok(None);
    };

    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_default();
    let (bytes, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| CountdownError::asset("font face data unavailable"))?;

    tracing::debug!(family = %family, index, "resolved countdown font");
    Ok(Some(ResolvedFont {
        bytes: Arc::new(bytes),
        index,
        family,
    }))
}

/// Upright monospaced face nearest regular weight and width, ties broken by family name.
fn monospace_face(db: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    db.faces()
        .filter(|f| f.monospaced && f.style == usvg::fontdb::Style::Normal)
        .min_by_key(|f| {
            (
                f.weight.0.abs_diff(usvg::fontdb::Weight::NORMAL.0),
                f.stretch != usvg::fontdb::Stretch::Normal,
                f.families.first().map(|(name, _)| name.clone()),
            )
        })
        .map(|f| f.id)
}

fn generic_face(db: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    let families = [
        usvg::fontdb::Family::Monospace,
        usvg::fontdb::Family::SansSerif,
        usvg::fontdb::Family::Serif,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Stateful helper for building Parley layouts with one registered font.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font` in a fresh Parley context.
    pub(crate) fn new(font: &ResolvedFont) -> CountdownResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::new(font.bytes.clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CountdownError::asset("no font families registered from font bytes"))?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CountdownError::asset("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub(crate) fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape and lay out a single line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CountdownResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CountdownError::render(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
