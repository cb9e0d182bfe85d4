use crate::foundation::core::Affine;
use crate::foundation::error::CardSkinResult;
use crate::render::backend::{FrameRGBA, Renderer, RendererCaps};
use crate::render::pool::SharedResourcePool;
use crate::render::texture::{TextureId, affine_to_cpu, shape_to_cpu_path, surface_dims};
use crate::scene::{Scene, SceneNode};

/// Software renderer on `vello_cpu`. Cards are drawn with their affine fit (no mesh support).
#[derive(Debug)]
pub struct CpuRenderer {
    max_texture_dim: u32,
    released: Vec<TextureId>,
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self {
            max_texture_dim: 4096,
            released: Vec::new(),
        }
    }

    pub fn with_max_texture_dim(mut self, dim: u32) -> Self {
        self.max_texture_dim = dim;
        self
    }

    /// Textures the engine has released so far, oldest first.
    pub fn released_textures(&self) -> &[TextureId] {
        &self.released
    }
}

impl Renderer for CpuRenderer {
    fn capabilities(&self) -> RendererCaps {
        RendererCaps {
            perspective_mesh: false,
            max_texture_dim: self.max_texture_dim,
        }
    }

    fn texture_released(&mut self, id: TextureId) {
        self.released.push(id);
    }

    #[tracing::instrument(level = "debug", skip_all, fields(cards = scene.len()))]
    fn render(&mut self, scene: &Scene, pool: &SharedResourcePool) -> CardSkinResult<FrameRGBA> {
        let (w, h) = surface_dims(scene.width(), scene.height())?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        let bg = scene.background();
        if bg.a > 0 {
            ctx.set_paint(bg.to_cpu());
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        }

        for (_, node) in scene.iter_by_z() {
            let card = node.geometry.affine(node.width, node.height);
            draw_shadow(&mut ctx, pool, node, card)?;
            draw_face(&mut ctx, node, card);
            draw_glare(&mut ctx, pool, node, card)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f64,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let opacity = opacity.clamp(0.0, 1.0) as f32;
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    draw(ctx);
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn draw_shadow(
    ctx: &mut vello_cpu::RenderContext,
    pool: &SharedResourcePool,
    node: &SceneNode,
    card: Affine,
) -> CardSkinResult<()> {
    if node.shadow.alpha <= 0.0 {
        return Ok(());
    }
    let shadow = pool.shared_shadow()?;
    let pad = pool.shadow_padding();
    let (tw, th) = (f64::from(shadow.width()), f64::from(shadow.height()));
    let fit = Affine::scale_non_uniform(
        (node.width + pad * 2.0) / tw,
        (node.height + pad * 2.0) / th,
    );
    let tr = Affine::translate(node.shadow.offset) * card * Affine::translate((-pad, -pad)) * fit;

    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(shadow.paint());
    with_opacity(ctx, node.shadow.alpha, |ctx| {
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, tw, th));
    });
    Ok(())
}

fn draw_face(ctx: &mut vello_cpu::RenderContext, node: &SceneNode, card: Affine) {
    let tex = &node.texture;
    let (tw, th) = (f64::from(tex.width()), f64::from(tex.height()));
    let tr = card * Affine::scale_non_uniform(node.width / tw, node.height / th);

    ctx.set_transform(affine_to_cpu(tr));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(tex.paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, tw, th));
}

fn draw_glare(
    ctx: &mut vello_cpu::RenderContext,
    pool: &SharedResourcePool,
    node: &SceneNode,
    card: Affine,
) -> CardSkinResult<()> {
    let g = node.glare;
    if g.alpha <= 0.0 {
        return Ok(());
    }
    let glare = pool.shared_glare()?;
    let (gw, gh) = (f64::from(glare.width()), f64::from(glare.height()));
    let (w, h) = (node.width, node.height);

    // Glare placement in card-local space; the fill below clips it to the card shape.
    let paint = Affine::translate((w / 2.0 + g.offset.x * w, h / 2.0 + g.offset.y * h))
        * Affine::rotate(g.rotation_deg.to_radians())
        * Affine::scale_non_uniform(w * 1.5 / gw, h * 1.5 / gh)
        * Affine::translate((-gw / 2.0, -gh / 2.0));
    let shape = kurbo::RoundedRect::new(0.0, 0.0, w, h, node.corner_radius);

    ctx.set_transform(affine_to_cpu(card));
    ctx.set_paint(glare.paint());
    ctx.set_paint_transform(affine_to_cpu(paint));
    with_opacity(ctx, g.alpha, |ctx| {
        ctx.fill_path(&shape_to_cpu_path(&shape));
    });
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
