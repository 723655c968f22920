use glam::Vec2;

/// Axis-aligned rectangle in global (map) units.
///
/// `min` is the corner with the smallest coordinates; `size` is never negative
/// for rectangles built through the constructors below.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centred on `center`.
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    /// Smallest rectangle containing every point of `points`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn bounding<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (lo, hi) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min: lo, size: hi - lo })
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Corners in counter-clockwise order starting at `min`.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            max,
            Vec2::new(self.min.x, max.y),
        ]
    }

    /// Overlap test with open edges: touching rectangles do not intersect.
    #[inline]
    pub fn intersects(self, other: Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    #[test]
    fn centered_places_min_half_size_away() {
        let rect = Rect::centered(Vec2::ZERO, Vec2::new(50.0, 20.0));
        assert_eq!(rect, r(-25.0, -10.0, 50.0, 20.0));
        assert_eq!(rect.center(), Vec2::ZERO);
    }

    #[test]
    fn bounding_of_points() {
        let pts = [Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0), Vec2::new(0.0, 0.0)];
        assert_eq!(Rect::bounding(pts), Some(r(-2.0, -1.0, 5.0, 5.0)));
        assert_eq!(Rect::bounding(std::iter::empty()), None);
    }

    #[test]
    fn corners_round_trip_through_bounding() {
        let rect = r(1.0, 2.0, 3.0, 4.0);
        assert_eq!(Rect::bounding(rect.corners()), Some(rect));
    }

    #[test]
    fn intersects_overlapping_and_touching() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(r(5.0, 5.0, 10.0, 10.0)));
        assert!(a.intersects(r(2.0, 2.0, 1.0, 1.0)));
        // Shared edge only.
        assert!(!a.intersects(r(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(r(-5.0, 20.0, 5.0, 5.0)));
    }
}
