use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::coords::{ScreenTransform, Viewport};

/// Logical half-extent of the shorter viewport axis, in scene units.
pub const HALF_EXTENT: f32 = 2.0;

/// Orthographic projection for a viewport.
///
/// The shorter axis always spans `±HALF_EXTENT`; the longer one grows with the
/// aspect ratio so content keeps its proportions. Zero extents are clamped to one
/// pixel, so `projection(0, h) == projection(1, h)`.
pub fn projection(viewport: Viewport) -> Mat4 {
    let v = viewport.clamped();
    let aspect = v.aspect();
    let e = HALF_EXTENT;

    if v.width >= v.height {
        Mat4::orthographic_rh_gl(-e / aspect, e / aspect, -e, e, -e, e)
    } else {
        Mat4::orthographic_rh_gl(-e, e, -e * aspect, e * aspect, -e, e)
    }
}

/// Pure 2D rotation by `radians` (counter-clockwise), no translation or scale.
#[inline]
pub fn model_view(radians: f32) -> Mat4 {
    Mat4::from_rotation_z(radians)
}

/// Uniform block shared by every draw of a frame.
///
/// Matrices are column-major, matching WGSL `mat4x4<f32>`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TransformUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

/// Projection and model-view matrices of the render thread.
///
/// Only mutated by message dispatch, which runs between frames; the draw pass
/// reads it through [`TransformState::uniforms`].
#[derive(Debug, Clone)]
pub struct TransformState {
    viewport: Viewport,
    angle: f32,
    projection: Mat4,
    model_view: Mat4,
}

impl TransformState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: viewport.clamped(),
            angle: 0.0,
            projection: projection(viewport),
            model_view: model_view(0.0),
        }
    }

    /// Recomputes the projection for a new drawable size.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport.clamped();
        self.projection = projection(viewport);
    }

    /// Recomputes the model-view rotation.
    pub fn rotate(&mut self, radians: f32) {
        self.angle = radians;
        self.model_view = model_view(radians);
    }

    /// Clamped drawable size.
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    /// Screen mapping producers use to recompute coverage for the current state.
    pub fn screen_transform(&self) -> ScreenTransform {
        ScreenTransform::new(self.viewport, self.angle)
    }

    pub fn uniforms(&self) -> TransformUniforms {
        TransformUniforms {
            projection: self.projection.to_cols_array_2d(),
            model_view: self.model_view.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    const EPS: f32 = 1e-6;

    /// Half-extents (x, y) of the box an orthographic matrix maps to NDC ±1.
    fn half_extents(m: Mat4) -> (f32, f32) {
        (1.0 / m.x_axis.x, 1.0 / m.y_axis.y)
    }

    #[test]
    fn zero_width_matches_one_pixel_width() {
        for h in [1, 50, 768] {
            let a = projection(Viewport::new(0, h)).to_cols_array();
            let b = projection(Viewport::new(1, h)).to_cols_array();
            let a: Vec<u32> = a.iter().map(|v| v.to_bits()).collect();
            let b: Vec<u32> = b.iter().map(|v| v.to_bits()).collect();
            assert_eq!(a, b, "height {h}");
        }
    }

    #[test]
    fn landscape_expands_horizontal_bounds() {
        let m = projection(Viewport::new(100, 50));
        let aspect = 50.0 / 100.0;
        let (hx, hy) = half_extents(m);
        assert!((hx - HALF_EXTENT / aspect).abs() < EPS);
        assert!((hy - HALF_EXTENT).abs() < EPS);

        // Closed form: the corner of the bounds lands on the NDC corner.
        let p = m * Vec4::new(HALF_EXTENT / aspect, HALF_EXTENT, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < EPS && (p.y - 1.0).abs() < EPS);
        assert_eq!(m.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn portrait_expands_vertical_bounds() {
        let m = projection(Viewport::new(50, 100));
        let aspect = 100.0 / 50.0;
        let (hx, hy) = half_extents(m);
        assert!((hx - HALF_EXTENT).abs() < EPS);
        assert!((hy - HALF_EXTENT * aspect).abs() < EPS);
    }

    #[test]
    fn projection_depth_terms() {
        let m = projection(Viewport::new(64, 64));
        assert!((m.z_axis.z - (-2.0 / (2.0 * HALF_EXTENT))).abs() < EPS);
        // Symmetric bounds: no translation.
        assert_eq!(m.w_axis, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(model_view(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let p = model_view(std::f32::consts::FRAC_PI_2).transform_point3(Vec3::X);
        assert!(p.x.abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn rotation_row_layout() {
        let a = 0.3f32;
        let m = model_view(a);
        assert!((m.row(0) - Vec4::new(a.cos(), -a.sin(), 0.0, 0.0)).abs().max_element() < EPS);
        assert!((m.row(1) - Vec4::new(a.sin(), a.cos(), 0.0, 0.0)).abs().max_element() < EPS);
        assert_eq!(m.row(2), Vec4::Z);
        assert_eq!(m.row(3), Vec4::W);
    }

    #[test]
    fn state_tracks_resize_and_rotation() {
        let mut t = TransformState::new(Viewport::new(0, 10));
        assert_eq!(t.viewport(), Viewport::new(1, 10));

        t.resize(Viewport::new(100, 50));
        assert_eq!(t.projection(), projection(Viewport::new(100, 50)));

        t.rotate(1.25);
        assert_eq!(t.angle(), 1.25);
        assert_eq!(t.screen_transform().angle(), 1.25);
        assert_eq!(t.uniforms().model_view, model_view(1.25).to_cols_array_2d());
    }
}
