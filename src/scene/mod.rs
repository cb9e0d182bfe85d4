//! Retained display list.
//!
//! The engine writes one node per live card; renderers only read it.

use std::collections::HashMap;

use crate::card::arena::CardId;
use crate::foundation::core::{Rgba8, Vec2};
use crate::foundation::error::{CardSkinError, CardSkinResult};
use crate::render::projection::CardGeometry;
use crate::render::texture::Texture;

/// Glare/foil overlay drawn over a card, clipped to its shape.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlareOverlay {
    pub alpha: f64,
    pub rotation_deg: f64,
    /// Streak offset as a fraction of the card size.
    pub offset: Vec2,
    /// Foil hue phase in `0..1`, driven by the pointer.
    pub foil_phase: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShadowParams {
    pub alpha: f64,
    pub offset: Vec2,
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub texture: Texture,
    pub geometry: CardGeometry,
    /// Logical card size the geometry is expressed against.
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub z_index: i32,
    pub glare: GlareOverlay,
    pub shadow: ShadowParams,
}

#[derive(Debug)]
pub struct Scene {
    width: u32,
    height: u32,
    background: Rgba8,
    nodes: HashMap<CardId, SceneNode>,
    revision: u64,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> CardSkinResult<Self> {
        if width == 0 || height == 0 || width > u32::from(u16::MAX) || height > u32::from(u16::MAX)
        {
            return Err(CardSkinError::validation(format!(
                "scene size {width}x{height} must be within 1..=65535"
            )));
        }
        Ok(Self {
            width,
            height,
            background: Rgba8::TRANSPARENT,
            nodes: HashMap::new(),
            revision: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Rgba8 {
        self.background
    }

    pub fn set_background(&mut self, color: Rgba8) {
        self.background = color;
    }

    /// Counts attaches, detaches and texture swaps.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn attach(&mut self, id: CardId, node: SceneNode) {
        self.nodes.insert(id, node);
        self.revision += 1;
    }

    pub fn detach(&mut self, id: CardId) -> Option<SceneNode> {
        let node = self.nodes.remove(&id)?;
        self.revision += 1;
        Some(node)
    }

    pub fn get(&self, id: CardId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Swap the displayed texture. Returns `false` for unknown ids.
    pub fn set_texture(&mut self, id: CardId, texture: Texture) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.texture.id() != texture.id() {
            node.texture = texture;
            self.revision += 1;
        }
        true
    }

    /// Per-frame transform/overlay update; not a structural change.
    pub fn set_frame(
        &mut self,
        id: CardId,
        geometry: CardGeometry,
        z_index: i32,
        glare: GlareOverlay,
        shadow: ShadowParams,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.geometry = geometry;
        node.z_index = z_index;
        node.glare = glare;
        node.shadow = shadow;
        true
    }

    pub fn set_size(&mut self, id: CardId, width: f64, height: f64, corner_radius: f64) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.width = width;
        node.height = height;
        node.corner_radius = corner_radius;
        true
    }

    /// Nodes in paint order: ascending z, ties broken by id.
    pub fn iter_by_z(&self) -> Vec<(CardId, &SceneNode)> {
        let mut out: Vec<_> = self.nodes.iter().map(|(id, n)| (*id, n)).collect();
        out.sort_by_key(|(id, n)| (n.z_index, *id));
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        if !self.nodes.is_empty() {
            self.nodes.clear();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
