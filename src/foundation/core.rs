use crate::foundation::error::{CardSkinError, CardSkinResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha scaled by `opacity` (clamped to 0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let a = (f32::from(self.a) * opacity).round().clamp(0.0, 255.0) as u8;
        Self { a, ..self }
    }

    pub fn premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Logical card face dimensions (before resolution scaling).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardSize {
    pub width: f64,
    pub height: f64,
}

impl CardSize {
    pub fn new(width: f64, height: f64) -> CardSkinResult<Self> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(CardSkinError::validation(
                "card size must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }

    /// Pixel dimensions of a surface holding this size at `scale`.
    pub fn pixel_size(self, scale: f64) -> CardSkinResult<(u32, u32)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CardSkinError::validation("resolution scale must be finite and > 0"));
        }
        let w = (self.width * scale).ceil().max(1.0);
        let h = (self.height * scale).ceil().max(1.0);
        if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
            return Err(CardSkinError::render(format!(
                "surface size {w}x{h} exceeds u16"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

/// Texture tier of a card face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Always resident, lower resolution.
    Small,
    /// Hover-only, higher resolution, tracked by the hi-res LRU.
    Large,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Small => f.write_str("small"),
            Self::Large => f.write_str("large"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
