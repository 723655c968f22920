/// Drawable size in physical pixels.
///
/// A zero extent is legal here (minimized windows report it); consumers that
/// divide by an extent go through [`Viewport::clamped`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns a copy with both extents raised to at least one pixel.
    #[inline]
    pub fn clamped(self) -> Self {
        Self::new(self.width.max(1), self.height.max(1))
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `height / width` of the clamped viewport.
    #[inline]
    pub fn aspect(self) -> f32 {
        let v = self.clamped();
        v.height as f32 / v.width as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_raises_zero_extents() {
        assert_eq!(Viewport::new(0, 0).clamped(), Viewport::new(1, 1));
        assert_eq!(Viewport::new(0, 40).clamped(), Viewport::new(1, 40));
        assert_eq!(Viewport::new(30, 40).clamped(), Viewport::new(30, 40));
    }

    #[test]
    fn aspect_is_height_over_width() {
        assert_eq!(Viewport::new(100, 50).aspect(), 0.5);
        assert_eq!(Viewport::new(50, 100).aspect(), 2.0);
        assert_eq!(Viewport::new(0, 7).aspect(), 7.0);
    }
}
