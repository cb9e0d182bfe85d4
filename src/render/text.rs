use std::borrow::Cow;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardSkinError, CardSkinResult};

/// RGBA8 brush carried through parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
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

/// Raw font bytes plus the face index inside them.
#[derive(Clone, Debug)]
pub(crate) struct FontSource {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) index: u32,
}

impl FontSource {
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
        }
    }
}

/// First sans-serif face the system font database knows about.
pub(crate) fn discover_system_font() -> Option<FontSource> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::SansSerif],
        ..Default::default()
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().next().map(|face| face.id))?;
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    tracing::debug!(faces = db.len(), "discovered system font for card text");
    Some(FontSource {
        bytes: Arc::new(bytes),
        index,
    })
}

/// Parley contexts with one registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    pub(crate) fn new(source: &FontSource) -> CardSkinResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(source.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardSkinError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardSkinError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(source.bytes.as_ref().clone()),
            source.index,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub(crate) fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
        max_width_px: Option<f32>,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(max_width_px);
        layout.align(
            max_width_px,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        layout
    }

    /// Lay out `text` at the largest size in `size_px..=min_px` whose height fits `max_height`.
    pub(crate) fn layout_fitted(
        &mut self,
        text: &str,
        size_px: f32,
        min_px: f32,
        brush: TextBrushRgba8,
        max_width_px: f32,
        max_height_px: f32,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut size = size_px;
        loop {
            let layout = self.layout(text, size, brush, Some(max_width_px));
            if layout.height() <= max_height_px || size <= min_px {
                return layout;
            }
            size = (size * 0.85).max(min_px);
        }
    }

    /// Fill the glyph runs of `layout` with its brushes, offset by `origin` under `transform`.
    pub(crate) fn draw(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layout: &parley::Layout<TextBrushRgba8>,
        transform: vello_cpu::kurbo::Affine,
        origin: (f64, f64),
    ) {
        ctx.set_transform(transform * vello_cpu::kurbo::Affine::translate(origin));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("family_name", &self.family_name)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
