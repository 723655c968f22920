use glam::{Mat2, Vec2};

use super::{Rect, Viewport};

/// Side length, in global units, of the region a screen shows before rotation.
pub const GLOBAL_EXTENT: f32 = 50.0;

/// Mapping between the pixel viewport and the rotated region of the map it shows.
///
/// The shown region is a `GLOBAL_EXTENT`-sized square centred on the global
/// origin and rotated by `angle` radians (counter-clockwise). Pixel space has
/// +Y down; global space has +Y up.
///
/// Tile producers receive this value after every rotation and use
/// [`ScreenTransform::global_bounds`] to recompute coverage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenTransform {
    viewport: Viewport,
    angle: f32,
    local: Rect,
}

impl ScreenTransform {
    pub fn new(viewport: Viewport, angle: f32) -> Self {
        Self {
            viewport: viewport.clamped(),
            angle,
            local: Rect::centered(Vec2::ZERO, Vec2::splat(GLOBAL_EXTENT)),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Unrotated region shown by the screen, in global units.
    #[inline]
    pub fn local_rect(&self) -> Rect {
        self.local
    }

    #[inline]
    fn rotation(&self) -> Mat2 {
        Mat2::from_angle(self.angle)
    }

    /// Maps a pixel position to global coordinates.
    pub fn pixel_to_global(&self, px: Vec2) -> Vec2 {
        let w = self.viewport.width as f32;
        let h = self.viewport.height as f32;
        let uv = Vec2::new(px.x / w, 1.0 - px.y / h);
        let local = self.local.min + uv * self.local.size;
        self.rotation() * local
    }

    /// Inverse of [`ScreenTransform::pixel_to_global`].
    pub fn global_to_pixel(&self, g: Vec2) -> Vec2 {
        let local = self.rotation().transpose() * g;
        let uv = (local - self.local.min) / self.local.size;
        Vec2::new(
            uv.x * self.viewport.width as f32,
            (1.0 - uv.y) * self.viewport.height as f32,
        )
    }

    /// Rotated screen corners in global coordinates.
    pub fn global_corners(&self) -> [Vec2; 4] {
        let rot = self.rotation();
        self.local.corners().map(|c| rot * c)
    }

    /// Axis-aligned bounding box of the rotated region.
    pub fn global_bounds(&self) -> Rect {
        Rect::bounding(self.global_corners()).unwrap_or(self.local)
    }
}
