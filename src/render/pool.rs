use std::cell::OnceCell;
use std::sync::Arc;

use crate::foundation::core::CardSize;
use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::render::blur::blur_alpha_mask;
use crate::render::texture::{Texture, render_texture, shape_to_cpu_path};

const SHADOW_ALPHA: f32 = 0.55;

/// Lazily built textures shared by every card: the drop shadow and the glare streak.
///
/// Both are built on first use and then handed out as the same `Arc` until the pool is dropped.
#[derive(Debug)]
pub struct SharedResourcePool {
    card: CardSize,
    corner_radius: f64,
    shadow_padding: f64,
    shadow: OnceCell<Arc<Texture>>,
    glare: OnceCell<Arc<Texture>>,
}

impl SharedResourcePool {
    /// `corner_radius` is a fraction of the card width.
    pub fn new(card: CardSize, corner_radius: f64) -> Self {
        let shadow_padding = (card.width.min(card.height) * 0.08).ceil().max(4.0);
        Self {
            card,
            corner_radius: corner_radius.clamp(0.0, 0.5) * card.width,
            shadow_padding,
            shadow: OnceCell::new(),
            glare: OnceCell::new(),
        }
    }

    /// Margin around the card covered by the shadow texture, in logical units.
    pub fn shadow_padding(&self) -> f64 {
        self.shadow_padding
    }

    pub fn card_size(&self) -> CardSize {
        self.card
    }

    pub fn shared_shadow(&self) -> CardSkinResult<Arc<Texture>> {
        if let Some(t) = self.shadow.get() {
            return Ok(t.clone());
        }
        let t = Arc::new(self.build_shadow()?);
        Ok(self.shadow.get_or_init(|| t).clone())
    }

    pub fn shared_glare(&self) -> CardSkinResult<Arc<Texture>> {
        if let Some(t) = self.glare.get() {
            return Ok(t.clone());
        }
        let t = Arc::new(self.build_glare()?);
        Ok(self.glare.get_or_init(|| t).clone())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn build_shadow(&self) -> CardSkinResult<Texture> {
        let pad = self.shadow_padding;
        let w = (self.card.width + pad * 2.0).ceil() as u32;
        let h = (self.card.height + pad * 2.0).ceil() as u32;

        let rr = kurbo::RoundedRect::new(
            pad,
            pad,
            pad + self.card.width,
            pad + self.card.height,
            self.corner_radius,
        );
        let coverage = render_texture(w, h, 1.0, |ctx| {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&shape_to_cpu_path(&rr));
        })?;

        let mask: Vec<u8> = coverage.pixels().chunks_exact(4).map(|px| px[3]).collect();
        let radius = (pad * 0.5).round().max(1.0) as u32;
        let blurred = blur_alpha_mask(&mask, w, h, radius, radius as f32 / 2.0)?;

        let mut rgba = Vec::with_capacity(blurred.len() * 4);
        for a in blurred {
            let a = (f32::from(a) * SHADOW_ALPHA).round() as u8;
            rgba.extend_from_slice(&[0, 0, 0, a]);
        }
        Texture::from_premul_rgba8(&rgba, w, h, 1.0)
            .map_err(|e| CardSkinError::render(format!("build shared shadow: {e}")))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn build_glare(&self) -> CardSkinResult<Texture> {
        let w = self.card.width.ceil().max(1.0) as u32;
        let h = self.card.height.ceil().max(1.0) as u32;

        // Soft band along the main diagonal, brightest on the diagonal itself.
        let (fw, fh) = (f64::from(w), f64::from(h));
        let len = (fw * fw + fh * fh).sqrt();
        let sigma = len * 0.12;
        let mut rgba = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
                let d = (px * fh - py * fw).abs() / len;
                let a = (-(d * d) / (2.0 * sigma * sigma)).exp();
                let a = (a * 255.0).round().clamp(0.0, 255.0) as u8;
                rgba.extend_from_slice(&[a, a, a, a]);
            }
        }
        Texture::from_premul_rgba8(&rgba, w, h, 1.0)
            .map_err(|e| CardSkinError::render(format!("build shared glare: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
