use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::texture::premul_bytes_to_pixmap;

/// Decoded artwork in premultiplied RGBA8 form.
///
/// Shared across cards as `Arc<ArtImage>`; the art cache hands out the same allocation to every
/// requester of a URL.
#[derive(Clone)]
pub struct ArtImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for ArtImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl ArtImage {
    /// Wrap premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(rgba8_premul: &[u8], width: u32, height: u32) -> CardSkinResult<Self> {
        let pixmap = premul_bytes_to_pixmap(rgba8_premul, width, height)?;
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(pixmap),
        })
    }

    /// Build from straight RGBA8 bytes (premultiplies a copy).
    pub fn from_straight_rgba8(rgba8: &[u8], width: u32, height: u32) -> CardSkinResult<Self> {
        let mut bytes = rgba8.to_vec();
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_rgba8(&bytes, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.pixmap.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into premultiplied artwork.
pub fn decode_image(bytes: &[u8]) -> CardSkinResult<ArtImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(CardSkinError::asset(format!(
            "artwork {width}x{height} exceeds the maximum surface size"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    ArtImage::from_premul_rgba8(&rgba8_premul, width, height)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

/// Inverse of premultiplication, for exporting straight RGBA8 (PNG).
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u32) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
