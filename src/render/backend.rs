use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::CardSkinResult;
use crate::render::pool::SharedResourcePool;
use crate::render::texture::TextureId;
use crate::scene::Scene;

/// What the host graphics layer can do. Queried once when the engine is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererCaps {
    /// Textured quads with true perspective; without it cards use the skew projection.
    pub perspective_mesh: bool,
    /// Largest texture side in pixels. Zero means the renderer is unusable.
    pub max_texture_dim: u32,
}

/// Rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy, as PNG encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Host graphics capability.
pub trait Renderer {
    fn capabilities(&self) -> RendererCaps;

    /// A texture will never be displayed again; free any GPU-side copy.
    fn texture_released(&mut self, _id: TextureId) {}

    fn render(&mut self, scene: &Scene, pool: &SharedResourcePool) -> CardSkinResult<FrameRGBA>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn capabilities(&self) -> RendererCaps {
        (**self).capabilities()
    }

    fn texture_released(&mut self, id: TextureId) {
        (**self).texture_released(id);
    }

    fn render(&mut self, scene: &Scene, pool: &SharedResourcePool) -> CardSkinResult<FrameRGBA> {
        (**self).render(scene, pool)
    }
}
