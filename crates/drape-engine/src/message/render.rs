use crate::render::RenderState;
use crate::tile::{DropDescriptor, TileKey};

/// Messages understood by the render thread.
///
/// `G` is the backend's geometry buffer type; a `Flush` moves one buffer from
/// the producer into the render thread's cache.
#[derive(Debug)]
pub enum RenderMessage<G> {
    /// Newly built geometry for `tile`, to be drawn with `state`.
    Flush {
        state: RenderState,
        tile: TileKey,
        buffer: G,
    },
    /// Evicts cached geometry.
    DropTiles(DropDescriptor),
    /// Drawable size changed, in physical pixels.
    Resize { width: u32, height: u32 },
    /// Map heading changed, in radians.
    Rotate { angle: f32 },
}

impl<G> RenderMessage<G> {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderMessage::Flush { .. } => "flush",
            RenderMessage::DropTiles(_) => "drop-tiles",
            RenderMessage::Resize { .. } => "resize",
            RenderMessage::Rotate { .. } => "rotate",
        }
    }
}
