use std::sync::Arc;

use crate::assets::decode::ArtImage;
use crate::config::EngineOptions;
use crate::engine::jobs::SkinSource;
use crate::foundation::core::{Point, Tier, Vec2};
use crate::foundation::math::{damp, normalize_signed};
use crate::model::card::CardVisualModel;
use crate::render::projection::{CardGeometry, CardProjection, ProjectionInput};
use crate::render::texture::Texture;
use crate::scene::{GlareOverlay, ShadowParams};

/// Hovered cards paint above every resting card.
pub const HOVER_Z_BOOST: i32 = 1_000_000;

/// Where a card sits. `x`/`y` is the top-left corner of the unscaled box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardLayout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Base scale at rest.
    pub scale: f64,
    pub z_index: i32,
    /// Overrides the engine's hover scale for this card.
    pub hover_scale: Option<f64>,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self::new(0.0, 0.0, 200.0, 280.0)
    }
}

impl CardLayout {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale: 1.0,
            z_index: 0,
            hover_scale: None,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_z_index(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    pub fn with_hover_scale(mut self, hover_scale: f64) -> Self {
        self.hover_scale = Some(hover_scale);
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn sanitized(mut self) -> Self {
        let pos = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        self.width = pos(self.width, 1.0);
        self.height = pos(self.height, 1.0);
        self.scale = pos(self.scale, 1.0);
        self.x = if self.x.is_finite() { self.x } else { 0.0 };
        self.y = if self.y.is_finite() { self.y } else { 0.0 };
        self.hover_scale = self.hover_scale.filter(|s| s.is_finite() && *s >= 1.0);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTransition {
    Entered,
    Left,
    Unchanged,
}

/// Monotonic per-tier generation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TierTokens {
    small: u64,
    large: u64,
}

impl TierTokens {
    pub fn current(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Small => self.small,
            Tier::Large => self.large,
        }
    }

    /// Invalidate every outstanding request for `tier` and return the new token.
    pub fn bump(&mut self, tier: Tier) -> u64 {
        let t = match tier {
            Tier::Small => &mut self.small,
            Tier::Large => &mut self.large,
        };
        *t += 1;
        *t
    }
}

/// Interpolation tuning shared by every card of an engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewTuning {
    pub(crate) hover_scale: f64,
    pub(crate) max_tilt_degrees: f64,
    pub(crate) tilt_damping_rate: f64,
    pub(crate) scale_damping_rate: f64,
    pub(crate) glare_max_alpha: f64,
    pub(crate) corner_radius: f64,
}

impl ViewTuning {
    pub(crate) fn from_options(opts: &EngineOptions) -> Self {
        Self {
            hover_scale: opts.hover_scale,
            max_tilt_degrees: opts.max_tilt_degrees,
            tilt_damping_rate: opts.tilt_damping_rate,
            scale_damping_rate: opts.scale_damping_rate,
            glare_max_alpha: opts.glare_max_alpha,
            corner_radius: opts.corner_radius,
        }
    }
}

/// Output of [`CardView::update`]: everything the scene needs for this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardFrame {
    pub geometry: CardGeometry,
    pub z_index: i32,
    pub glare: GlareOverlay,
    pub shadow: ShadowParams,
}

/// Per-card state. Pure interpolation lives here; texture orchestration lives in the engine.
#[derive(Debug)]
pub(crate) struct CardView {
    pub(crate) model: CardVisualModel,
    layout: CardLayout,
    tuning: ViewTuning,
    projection: Box<dyn CardProjection>,

    hovered: bool,
    pointer: Vec2,
    tilt: Vec2,
    tilt_target: Vec2,
    scale: f64,
    scale_target: f64,
    frame: CardFrame,

    pub(crate) tokens: TierTokens,
    pub(crate) small: Texture,
    pub(crate) large: Option<Texture>,
    pub(crate) large_pending: bool,
    pub(crate) skin: SkinSource,
    pub(crate) art: Option<Arc<ArtImage>>,
    pub(crate) art_waiting: Option<String>,
}

impl CardView {
    pub(crate) fn new(
        model: CardVisualModel,
        layout: CardLayout,
        small: Texture,
        projection: Box<dyn CardProjection>,
        tuning: ViewTuning,
    ) -> Self {
        let layout = layout.sanitized();
        let mut view = Self {
            model,
            layout,
            tuning,
            projection,
            hovered: false,
            pointer: Vec2::ZERO,
            tilt: Vec2::ZERO,
            tilt_target: Vec2::ZERO,
            scale: layout.scale,
            scale_target: layout.scale,
            frame: CardFrame {
                geometry: CardGeometry::Affine(crate::foundation::core::Affine::IDENTITY),
                z_index: layout.z_index,
                glare: GlareOverlay::default(),
                shadow: ShadowParams::default(),
            },
            tokens: TierTokens::default(),
            small,
            large: None,
            large_pending: false,
            skin: SkinSource::Compose,
            art: None,
            art_waiting: None,
        };
        view.frame = view.compute_frame();
        view
    }

    pub(crate) fn layout(&self) -> CardLayout {
        self.layout
    }

    pub(crate) fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Current tilt in degrees: `x` about the horizontal axis, `y` about the vertical one.
    pub(crate) fn tilt(&self) -> Vec2 {
        self.tilt
    }

    pub(crate) fn tilt_target(&self) -> Vec2 {
        self.tilt_target
    }

    pub(crate) fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn scale_target(&self) -> f64 {
        self.scale_target
    }

    pub(crate) fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub(crate) fn frame(&self) -> CardFrame {
        self.frame
    }

    pub(crate) fn projection_name(&self) -> &'static str {
        self.projection.name()
    }

    fn hover_scale(&self) -> f64 {
        self.layout.hover_scale.unwrap_or(self.tuning.hover_scale)
    }

    fn retarget_scale(&mut self) {
        self.scale_target = if self.hovered {
            self.layout.scale * self.hover_scale()
        } else {
            self.layout.scale
        };
    }

    pub(crate) fn set_layout(&mut self, layout: CardLayout) {
        self.layout = layout.sanitized();
        self.retarget_scale();
    }

    /// Pointer position in card-local units (`0..width`, `0..height`).
    pub(crate) fn set_pointer_local(&mut self, x: f64, y: f64, hovered: bool) -> HoverTransition {
        let transition = self.set_hovered(hovered);
        if hovered {
            self.pointer = Vec2::new(
                normalize_signed(x, self.layout.width),
                normalize_signed(y, self.layout.height),
            );
            let max = self.tuning.max_tilt_degrees;
            self.tilt_target = Vec2::new(self.pointer.y * max, self.pointer.x * max);
        }
        transition
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) -> HoverTransition {
        if hovered == self.hovered {
            return HoverTransition::Unchanged;
        }
        self.hovered = hovered;
        if !hovered {
            self.pointer = Vec2::ZERO;
            self.tilt_target = Vec2::ZERO;
        }
        self.retarget_scale();
        if hovered {
            HoverTransition::Entered
        } else {
            HoverTransition::Left
        }
    }

    /// Texture to show: the large tier only while hovered and resident.
    pub(crate) fn display_texture(&self) -> &Texture {
        match (&self.large, self.hovered) {
            (Some(large), true) => large,
            _ => &self.small,
        }
    }

    /// Advance interpolation by `dt` seconds. Never touches textures.
    pub(crate) fn update(&mut self, dt: f64) -> CardFrame {
        let rate = self.tuning.tilt_damping_rate;
        self.tilt = Vec2::new(
            damp(self.tilt.x, self.tilt_target.x, rate, dt),
            damp(self.tilt.y, self.tilt_target.y, rate, dt),
        );
        self.scale = damp(self.scale, self.scale_target, self.tuning.scale_damping_rate, dt);
        self.frame = self.compute_frame();
        self.frame
    }

    fn compute_frame(&self) -> CardFrame {
        let l = self.layout;
        let geometry = self.projection.project(&ProjectionInput {
            center: l.center(),
            width: l.width,
            height: l.height,
            scale: self.scale,
            tilt_x_deg: self.tilt.x,
            tilt_y_deg: self.tilt.y,
        });

        let max = self.tuning.max_tilt_degrees;
        let t = if max > 0.0 { self.tilt / max } else { Vec2::ZERO };
        let strength = t.hypot().clamp(0.0, 1.0);

        let hover_range = l.scale * (self.hover_scale() - 1.0);
        let lift = if hover_range > 0.0 {
            ((self.scale - l.scale) / hover_range).clamp(0.0, 1.0)
        } else if self.hovered {
            1.0
        } else {
            0.0
        };

        let glare = GlareOverlay {
            alpha: self.tuning.glare_max_alpha * strength,
            rotation_deg: t.x.atan2(t.y).to_degrees(),
            offset: Vec2::new(-t.y * 0.5, -t.x * 0.5),
            foil_phase: ((self.pointer.x + self.pointer.y) * 0.25 + 0.5).rem_euclid(1.0),
        };
        let shadow = ShadowParams {
            alpha: 0.35 + 0.25 * lift,
            offset: Vec2::new(-t.y * 4.0, 6.0 + 6.0 * lift),
        };

        CardFrame {
            geometry,
            z_index: if self.hovered {
                l.z_index.saturating_add(HOVER_Z_BOOST)
            } else {
                l.z_index
            },
            glare,
            shadow,
        }
    }

    pub(crate) fn corner_radius(&self) -> f64 {
        self.tuning.corner_radius * self.layout.width
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/view.rs"]
mod tests;
