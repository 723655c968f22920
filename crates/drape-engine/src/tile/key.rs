use core::cmp::Ordering;
use core::fmt;

use crate::coords::Rect;

/// Identity of one map tile: grid position plus zoom level.
///
/// Ordering rules:
/// 1) `zoom`: ascending
/// 2) `y`, then `x`: ascending (row-major within a level)
///
/// The key is only ever used for cache lookups; it carries no geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TileKey {
    pub x: i32,
    pub y: i32,
    pub zoom: u8,
}

impl TileKey {
    #[inline]
    pub const fn new(x: i32, y: i32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Side length of a tile at `zoom`, for a world of `world_size` units.
    #[inline]
    pub fn tile_size(world_size: f32, zoom: u8) -> f32 {
        world_size / (1u32 << zoom.min(31)) as f32
    }

    /// Region covered by this tile, in global units, for a world of `world_size` units.
    #[inline]
    pub fn bounds(self, world_size: f32) -> Rect {
        let size = Self::tile_size(world_size, self.zoom);
        Rect::new(self.x as f32 * size, self.y as f32 * size, size, size)
    }
}

impl Ord for TileKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.zoom
            .cmp(&other.zoom)
            .then(self.y.cmp(&other.y))
            .then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for TileKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_zoom_then_row_then_column() {
        let mut keys = vec![
            TileKey::new(1, 0, 2),
            TileKey::new(0, 1, 1),
            TileKey::new(0, 0, 2),
            TileKey::new(5, 0, 1),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                TileKey::new(5, 0, 1),
                TileKey::new(0, 1, 1),
                TileKey::new(0, 0, 2),
                TileKey::new(1, 0, 2),
            ]
        );
    }

    #[test]
    fn bounds_follow_grid() {
        let b = TileKey::new(-1, 2, 2).bounds(40.0);
        assert_eq!(b, Rect::new(-10.0, 20.0, 10.0, 10.0));
    }

    #[test]
    fn display_is_zoom_x_y() {
        assert_eq!(TileKey::new(3, -4, 7).to_string(), "7/3/-4");
    }
}
