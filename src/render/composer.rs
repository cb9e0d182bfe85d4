//! Procedural card faces.
//!
//! The face is a fixed stack: frame, category tint, artwork window, name band, text zone and
//! (creatures only) stat badges. All geometry is expressed in logical card units and scaled by
//! the requested resolution, so the small and large tiers are the same picture at two sizes.

use crate::assets::decode::ArtImage;
use crate::foundation::core::{CardSize, Rgba8};
use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::model::card::{CardCategory, CardVisualModel};
use crate::render::text::{FontSource, TextBrushRgba8, TextLayoutEngine, discover_system_font};
use crate::render::texture::{Texture, affine_to_cpu, render_texture, shape_to_cpu_path};

const FRAME: Rgba8 = Rgba8::opaque(28, 24, 22);
const NAME_BAND: Rgba8 = Rgba8::new(0, 0, 0, 150);
const TEXT_ZONE: Rgba8 = Rgba8::new(244, 236, 218, 215);
const TEXT_DARK: Rgba8 = Rgba8::opaque(36, 30, 26);
const COST_BADGE: Rgba8 = Rgba8::opaque(46, 98, 204);
const ATTACK_BADGE: Rgba8 = Rgba8::opaque(214, 150, 36);
const HEALTH_BADGE: Rgba8 = Rgba8::opaque(192, 38, 44);

/// Fraction of the card height covered by the bottom edge of the artwork window.
pub const ART_BOTTOM: f64 = 0.62;

fn category_tint(category: CardCategory) -> Rgba8 {
    match category {
        CardCategory::Creature => Rgba8::opaque(168, 104, 56),
        CardCategory::Spell => Rgba8::opaque(60, 98, 170),
        CardCategory::Trap => Rgba8::opaque(134, 56, 124),
    }
}

fn placeholder_tint(category: CardCategory) -> Rgba8 {
    let c = category_tint(category);
    Rgba8::opaque(c.r / 2 + 20, c.g / 2 + 20, c.b / 2 + 20)
}

/// Card face regions in logical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceLayout {
    pub border: f64,
    pub corner_radius: f64,
    pub art: kurbo::Rect,
    pub name_band: kurbo::Rect,
    pub text_zone: kurbo::Rect,
    pub badge_radius: f64,
}

impl FaceLayout {
    pub fn new(card: CardSize, corner_radius: f64) -> Self {
        let (w, h) = (card.width, card.height);
        let border = w * 0.035;
        let inset = border * 2.0;
        let art = kurbo::Rect::new(inset, inset, w - inset, h * ART_BOTTOM);
        let name_band = kurbo::Rect::new(inset, inset, w - inset, inset + h * 0.1);
        let text_zone = kurbo::Rect::new(inset, h * (ART_BOTTOM + 0.025), w - inset, h - inset);
        Self {
            border,
            corner_radius: corner_radius.clamp(0.0, 0.5) * w,
            art,
            name_band,
            text_zone,
            badge_radius: w * 0.09,
        }
    }

    pub fn cost_badge(&self) -> kurbo::Point {
        kurbo::Point::new(
            self.art.x0 + self.badge_radius * 0.6,
            self.art.y0 + self.badge_radius * 0.6,
        )
    }

    pub fn attack_badge(&self) -> kurbo::Point {
        kurbo::Point::new(
            self.text_zone.x0 + self.badge_radius * 0.6,
            self.text_zone.y1 - self.badge_radius * 0.6,
        )
    }

    pub fn health_badge(&self) -> kurbo::Point {
        kurbo::Point::new(
            self.text_zone.x1 - self.badge_radius * 0.6,
            self.text_zone.y1 - self.badge_radius * 0.6,
        )
    }
}

/// Draws card faces procedurally. Deterministic for equal inputs.
#[derive(Debug)]
pub struct CardComposer {
    card: CardSize,
    layout: FaceLayout,
    max_texture_dim: u32,
    text: Option<TextLayoutEngine>,
}

impl CardComposer {
    /// Text uses `font_bytes` when given and usable, otherwise a system sans-serif. Without any
    /// font the face is drawn without text.
    pub fn new(card: CardSize, font_bytes: Option<Vec<u8>>, corner_radius: f64) -> Self {
        let source = match font_bytes {
            Some(bytes) => Some(FontSource::from_bytes(bytes)),
            None => discover_system_font(),
        };
        let text = source.and_then(|s| match TextLayoutEngine::new(&s) {
            Ok(engine) => Some(engine),
            Err(err) => {
                tracing::warn!(error = %err, "card font unusable; faces are drawn without text");
                None
            }
        });
        Self::with_text(card, corner_radius, text)
    }

    /// A composer that never draws text.
    pub fn without_text(card: CardSize, corner_radius: f64) -> Self {
        Self::with_text(card, corner_radius, None)
    }

    fn with_text(card: CardSize, corner_radius: f64, text: Option<TextLayoutEngine>) -> Self {
        Self {
            card,
            layout: FaceLayout::new(card, corner_radius),
            max_texture_dim: u32::from(u16::MAX),
            text,
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn face_layout(&self) -> &FaceLayout {
        &self.layout
    }

    /// Bound output textures to `dim` pixels per side.
    pub fn set_max_texture_dim(&mut self, dim: u32) {
        self.max_texture_dim = dim.clamp(1, u32::from(u16::MAX));
    }

    /// Scale actually used for a requested `scale` after applying the texture size bound.
    pub fn effective_scale(&self, scale: f64) -> f64 {
        let longest = self.card.width.max(self.card.height);
        let fit = f64::from(self.max_texture_dim) / longest;
        if scale > fit { fit } else { scale }
    }

    #[tracing::instrument(level = "debug", skip(self, model, art), fields(card = model.id()))]
    pub fn compose(
        &mut self,
        model: &CardVisualModel,
        scale: f64,
        art: Option<&ArtImage>,
    ) -> CardSkinResult<Texture> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CardSkinError::validation(
                "compose scale must be finite and > 0",
            ));
        }
        let scale = self.effective_scale(scale);
        let (w, h) = self.card.pixel_size(scale)?;
        let base = vello_cpu::kurbo::Affine::scale(scale);
        let card = self.card;
        let layout = self.layout;
        let text = self.text.as_mut();

        render_texture(w, h, scale, |ctx| {
            draw_frame(ctx, base, card, &layout, model.category());
            draw_art(ctx, base, &layout, model.category(), art);
            fill(ctx, base, &layout.name_band, NAME_BAND);
            let zone = kurbo::RoundedRect::from_rect(layout.text_zone, layout.border);
            fill(ctx, base, &zone, TEXT_ZONE);
            if model.shows_stat_badges() {
                draw_badges(ctx, base, &layout);
            }
            if let Some(text) = text {
                draw_text(ctx, base, &layout, text, model);
            }
        })
    }
}

fn fill(
    ctx: &mut vello_cpu::RenderContext,
    base: vello_cpu::kurbo::Affine,
    shape: &impl kurbo::Shape,
    color: Rgba8,
) {
    ctx.set_transform(base);
    ctx.set_paint(color.to_cpu());
    ctx.fill_path(&shape_to_cpu_path(shape));
}

fn draw_frame(
    ctx: &mut vello_cpu::RenderContext,
    base: vello_cpu::kurbo::Affine,
    card: CardSize,
    layout: &FaceLayout,
    category: CardCategory,
) {
    let outer = kurbo::RoundedRect::new(0.0, 0.0, card.width, card.height, layout.corner_radius);
    fill(ctx, base, &outer, FRAME);

    let b = layout.border;
    let inner = kurbo::RoundedRect::new(
        b,
        b,
        card.width - b,
        card.height - b,
        (layout.corner_radius - b).max(0.0),
    );
    fill(ctx, base, &inner, category_tint(category));
}

fn draw_art(
    ctx: &mut vello_cpu::RenderContext,
    base: vello_cpu::kurbo::Affine,
    layout: &FaceLayout,
    category: CardCategory,
    art: Option<&ArtImage>,
) {
    let window = kurbo::RoundedRect::from_rect(layout.art, layout.border);
    let Some(art) = art else {
        fill(ctx, base, &window, placeholder_tint(category));
        return;
    };

    // Cover fit: scale to fill the window, crop the overflow evenly.
    let (iw, ih) = (f64::from(art.width()), f64::from(art.height()));
    let r = layout.art;
    let s = (r.width() / iw).max(r.height() / ih);
    let paint = kurbo::Affine::translate((
        r.x0 + (r.width() - iw * s) / 2.0,
        r.y0 + (r.height() - ih * s) / 2.0,
    )) * kurbo::Affine::scale(s);

    ctx.set_transform(base);
    ctx.set_paint(art.paint());
    ctx.set_paint_transform(affine_to_cpu(paint));
    ctx.fill_path(&shape_to_cpu_path(&window));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn draw_badges(ctx: &mut vello_cpu::RenderContext, base: vello_cpu::kurbo::Affine, layout: &FaceLayout) {
    let r = layout.badge_radius;
    for (center, color) in [
        (layout.cost_badge(), COST_BADGE),
        (layout.attack_badge(), ATTACK_BADGE),
        (layout.health_badge(), HEALTH_BADGE),
    ] {
        fill(ctx, base, &kurbo::Circle::new(center, r), FRAME);
        fill(ctx, base, &kurbo::Circle::new(center, r * 0.82), color);
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    base: vello_cpu::kurbo::Affine,
    layout: &FaceLayout,
    text: &mut TextLayoutEngine,
    model: &CardVisualModel,
) {
    let white = TextBrushRgba8::from(Rgba8::WHITE);
    let dark = TextBrushRgba8::from(TEXT_DARK);
    let band = layout.name_band;
    let pad = layout.border * 1.5;
    let badge_room = if model.shows_stat_badges() {
        layout.badge_radius * 1.4
    } else {
        0.0
    };

    let name_x = band.x0 + pad + badge_room;
    let name_w = (band.x1 - pad - name_x).max(1.0) as f32;
    let name_size = (band.height() * 0.55) as f32;
    let name = text.layout_fitted(
        model.name(),
        name_size,
        name_size * 0.5,
        white,
        name_w,
        band.height() as f32,
    );
    let name_y = band.y0 + (band.height() - f64::from(name.height())).max(0.0) / 2.0;
    text.draw(ctx, &name, base, (name_x, name_y));

    let zone = layout.text_zone;
    let line_size = (zone.height() * 0.11) as f32;
    let zone_w = (zone.width() - pad * 2.0).max(1.0) as f32;
    let mut y = zone.y0 + pad * 0.5;

    let type_line = text.layout(&model.type_line(), line_size, dark, Some(zone_w));
    text.draw(ctx, &type_line, base, (zone.x0 + pad, y));
    y += f64::from(type_line.height()) + pad * 0.5;

    for ability in model.ability_lines() {
        let l = text.layout(&ability, line_size * 0.9, dark, Some(zone_w));
        text.draw(ctx, &l, base, (zone.x0 + pad, y));
        y += f64::from(l.height());
    }

    if model.shows_stat_badges() {
        let r = layout.badge_radius;
        for (center, value) in [
            (layout.cost_badge(), model.cost()),
            (layout.attack_badge(), model.attack()),
            (layout.health_badge(), model.health()),
        ] {
            let l = text.layout(&value.to_string(), (r * 1.1) as f32, white, None);
            let origin = (
                center.x - f64::from(l.width()) / 2.0,
                center.y - f64::from(l.height()) / 2.0,
            );
            text.draw(ctx, &l, base, origin);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composer.rs"]
mod tests;
