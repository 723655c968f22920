use crate::coords::ScreenTransform;

/// Messages understood by the tile-producer (resource upload) thread.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadMessage {
    /// The screen changed; recompute which tiles are needed.
    UpdateCoverage(ScreenTransform),
}
