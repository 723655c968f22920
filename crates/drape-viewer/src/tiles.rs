use drape_engine::coords::{ColorRgba, Rect, GLOBAL_EXTENT};
use drape_engine::device::TileMesh;
use drape_engine::render::{BlendMode, ProgramIndex, RenderState, HALF_EXTENT};
use drape_engine::tile::TileKey;

/// Global units to scene units: the screen's global square fills the ±HALF_EXTENT box.
const SCENE_SCALE: f32 = 2.0 * HALF_EXTENT / GLOBAL_EXTENT;

/// Fill geometry, drawn first.
pub const FILL_STATE: RenderState = RenderState::new(ProgramIndex::SOLID_AREA);

/// Translucent tile borders, drawn over the fills.
pub const BORDER_STATE: RenderState = RenderState::new(ProgramIndex::SOLID_AREA)
    .with_depth_layer(1)
    .with_blend(BlendMode::Alpha);

/// Regular tile grid at a single zoom level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileGrid {
    /// Side of the whole map, in global units.
    pub world_size: f32,
    pub zoom: u8,
    /// Border thickness, in global units.
    pub border: f32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self {
            world_size: 400.0,
            zoom: 5,
            border: 0.4,
        }
    }
}

impl TileGrid {
    #[inline]
    pub fn tile_size(&self) -> f32 {
        TileKey::tile_size(self.world_size, self.zoom)
    }

    /// Tiles overlapping `area` (open edges), row-major.
    pub fn covering(&self, area: Rect) -> Vec<TileKey> {
        if area.is_empty() {
            return Vec::new();
        }
        let size = self.tile_size();
        let min = (area.min / size).floor();
        let max = (area.max() / size).ceil();

        let (x0, y0) = (min.x as i32, min.y as i32);
        let (x1, y1) = (max.x as i32, max.y as i32);

        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| TileKey::new(x, y, self.zoom)))
            .collect()
    }

    fn scene_rect(&self, global: Rect) -> Rect {
        Rect::new(
            global.min.x * SCENE_SCALE,
            global.min.y * SCENE_SCALE,
            global.size.x * SCENE_SCALE,
            global.size.y * SCENE_SCALE,
        )
    }

    /// Checkerboard fill for `key`.
    pub fn fill_mesh(&self, key: TileKey) -> TileMesh {
        let shade = if (key.x + key.y).rem_euclid(2) == 0 { 0.78 } else { 0.7 };
        let tint = (key.x.rem_euclid(7) as f32) * 0.02;
        let color = ColorRgba::new(shade - tint, shade, shade + tint, 1.0);
        TileMesh::quad(self.scene_rect(key.bounds(self.world_size)), color)
    }

    /// Four thin quads along the tile edges, premultiplied dark blue.
    pub fn border_mesh(&self, key: TileKey) -> TileMesh {
        let b = key.bounds(self.world_size);
        let t = self.border.min(b.size.x * 0.5);
        let a = 0.35;
        let color = ColorRgba::new(0.1 * a, 0.2 * a, 0.5 * a, a);

        let edges = [
            Rect::new(b.min.x, b.min.y, b.size.x, t),
            Rect::new(b.min.x, b.max().y - t, b.size.x, t),
            Rect::new(b.min.x, b.min.y + t, t, b.size.y - 2.0 * t),
            Rect::new(b.max().x - t, b.min.y + t, t, b.size.y - 2.0 * t),
        ];

        let mut mesh = TileMesh::empty();
        for edge in edges {
            mesh.push_quad(self.scene_rect(edge), color);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(tile: f32) -> TileGrid {
        TileGrid {
            world_size: tile * 4.0,
            zoom: 2,
            border: 0.5,
        }
    }

    #[test]
    fn covering_includes_partially_visible_tiles() {
        let g = grid(10.0);
        let keys = g.covering(Rect::new(-5.0, -5.0, 10.0, 10.0));
        assert_eq!(
            keys,
            vec![
                TileKey::new(-1, -1, 2),
                TileKey::new(0, -1, 2),
                TileKey::new(-1, 0, 2),
                TileKey::new(0, 0, 2),
            ]
        );
    }

    #[test]
    fn covering_aligned_area_excludes_touching_tiles() {
        let g = grid(10.0);
        let keys = g.covering(Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(keys, vec![TileKey::new(0, 0, 2), TileKey::new(1, 0, 2)]);
        assert!(g.covering(Rect::new(0.0, 0.0, 0.0, 10.0)).is_empty());
    }

    #[test]
    fn meshes_are_in_scene_units() {
        let g = grid(GLOBAL_EXTENT / 2.0);
        let fill = g.fill_mesh(TileKey::new(0, 0, 2));
        // One tile spans half the screen, i.e. HALF_EXTENT scene units.
        let [x, y] = fill.vertices()[2].pos;
        assert!((x - HALF_EXTENT).abs() < 1e-5 && (y - HALF_EXTENT).abs() < 1e-5);
        assert_eq!(g.border_mesh(TileKey::new(0, 0, 2)).indices().len(), 24);
    }

    #[test]
    fn borders_draw_after_fills() {
        assert!(FILL_STATE < BORDER_STATE);
    }
}
