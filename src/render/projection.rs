use crate::foundation::core::{Affine, Point, Vec2};

/// On-screen placement of a card face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardGeometry {
    /// Projected corners: top-left, top-right, bottom-right, bottom-left.
    Quad([Point; 4]),
    /// Maps card-local coordinates (`0..width`, `0..height`) into the scene.
    Affine(Affine),
}

impl CardGeometry {
    /// Best affine approximation mapping a `width x height` card into the scene.
    ///
    /// Quads are fitted through their top-left, top-right and bottom-left corners.
    pub fn affine(&self, width: f64, height: f64) -> Affine {
        match *self {
            Self::Affine(a) => a,
            Self::Quad([tl, tr, _, bl]) => {
                let (w, h) = (width.max(f64::EPSILON), height.max(f64::EPSILON));
                let ex = (tr - tl) / w;
                let ey = (bl - tl) / h;
                Affine::new([ex.x, ex.y, ey.x, ey.y, tl.x, tl.y])
            }
        }
    }

    pub fn corners(&self, width: f64, height: f64) -> [Point; 4] {
        match *self {
            Self::Quad(q) => q,
            Self::Affine(a) => [
                a * Point::new(0.0, 0.0),
                a * Point::new(width, 0.0),
                a * Point::new(width, height),
                a * Point::new(0.0, height),
            ],
        }
    }

    pub fn bounds(&self, width: f64, height: f64) -> kurbo::Rect {
        let c = self.corners(width, height);
        let mut r = kurbo::Rect::from_points(c[0], c[1]);
        r = r.union_pt(c[2]);
        r.union_pt(c[3])
    }
}

/// Per-frame inputs to a projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionInput {
    /// Card center in scene coordinates.
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
    /// Rotation about the horizontal axis, degrees. Positive pushes the bottom edge away.
    pub tilt_x_deg: f64,
    /// Rotation about the vertical axis, degrees. Positive pushes the right edge away.
    pub tilt_y_deg: f64,
}

/// Strategy that turns tilt and scale into card geometry.
pub trait CardProjection: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn project(&self, input: &ProjectionInput) -> CardGeometry;
}

/// True perspective warp; needs a renderer that can draw textured quads.
#[derive(Clone, Copy, Debug)]
pub struct PerspectiveProjection {
    pub distance: f64,
}

impl CardProjection for PerspectiveProjection {
    fn name(&self) -> &'static str {
        "perspective"
    }

    fn project(&self, input: &ProjectionInput) -> CardGeometry {
        let (sx, cx) = input.tilt_x_deg.to_radians().sin_cos();
        let (sy, cy) = input.tilt_y_deg.to_radians().sin_cos();
        let hw = input.width * input.scale / 2.0;
        let hh = input.height * input.scale / 2.0;
        let d = self.distance.max(1.0);

        let project = |x: f64, y: f64| {
            let z = -x * sy - y * sx;
            let f = d / (d - z).max(1.0);
            input.center + Vec2::new(x * cy * f, y * cx * f)
        };
        CardGeometry::Quad([
            project(-hw, -hh),
            project(hw, -hh),
            project(hw, hh),
            project(-hw, hh),
        ])
    }
}

/// Affine stand-in for perspective: foreshortening plus a small shear toward the tilt.
#[derive(Clone, Copy, Debug)]
pub struct SkewProjection {
    pub shear: f64,
}

impl Default for SkewProjection {
    fn default() -> Self {
        Self { shear: 0.15 }
    }
}

impl CardProjection for SkewProjection {
    fn name(&self) -> &'static str {
        "skew"
    }

    fn project(&self, input: &ProjectionInput) -> CardGeometry {
        let (sx, cx) = input.tilt_x_deg.to_radians().sin_cos();
        let (sy, cy) = input.tilt_y_deg.to_radians().sin_cos();
        let tilt = Affine::new([cy, -sy * self.shear, -sx * self.shear, cx, 0.0, 0.0]);
        CardGeometry::Affine(
            Affine::translate(input.center.to_vec2())
                * tilt
                * Affine::scale(input.scale)
                * Affine::translate((-input.width / 2.0, -input.height / 2.0)),
        )
    }
}

/// Pick the projection strategy for a renderer. Done once per card.
pub fn select_projection(perspective_mesh: bool, distance: f64) -> Box<dyn CardProjection> {
    if perspective_mesh {
        Box::new(PerspectiveProjection { distance })
    } else {
        Box::new(SkewProjection::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/projection.rs"]
mod tests;
