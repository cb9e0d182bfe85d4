use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::foundation::math::pixel_fingerprint;

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique texture identity, reported to the renderer on release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Immutable premultiplied RGBA8 surface.
///
/// Cloning an `Arc<Texture>` shares pixels; the pixels themselves never change after creation.
#[derive(Clone)]
pub struct Texture {
    id: TextureId,
    scale: f64,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl Texture {
    /// Wrap a rendered pixmap. `scale` is pixels per logical unit.
    pub(crate) fn from_pixmap(pixmap: vello_cpu::Pixmap, scale: f64) -> Self {
        Self {
            id: TextureId::next(),
            scale: sanitize_scale(scale),
            pixmap: Arc::new(pixmap),
        }
    }

    /// Build a texture from tightly packed premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(
        rgba8_premul: &[u8],
        width: u32,
        height: u32,
        scale: f64,
    ) -> CardSkinResult<Self> {
        let pixmap = premul_bytes_to_pixmap(rgba8_premul, width, height)?;
        Ok(Self::from_pixmap(pixmap, scale))
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size in logical units (pixels divided by scale).
    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.width()) / self.scale,
            f64::from(self.height()) / self.scale,
        )
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width() || y >= self.height() {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width() as usize) + (x as usize)) * 4;
        let px = &self.pixels()[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }

    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.pixels().to_vec();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Content hash over dimensions and pixels.
    pub fn fingerprint(&self) -> u64 {
        pixel_fingerprint(self.width(), self.height(), self.pixels())
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.pixmap.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

fn sanitize_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

pub(crate) fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardSkinResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardSkinError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardSkinError::render("image height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CardSkinError::render("image has zero size"));
    }
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardSkinError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn surface_dims(width: u32, height: u32) -> CardSkinResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardSkinError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardSkinError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(CardSkinError::render("surface has zero size"));
    }
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn shape_to_cpu_path(shape: &impl kurbo::Shape) -> vello_cpu::kurbo::BezPath {
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        p.push(el);
    }
    p
}

/// Render into a fresh `width x height` pixmap and wrap it as a texture.
pub(crate) fn render_texture(
    width: u32,
    height: u32,
    scale: f64,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> CardSkinResult<Texture> {
    let (w, h) = surface_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(Texture::from_pixmap(pixmap, scale))
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
