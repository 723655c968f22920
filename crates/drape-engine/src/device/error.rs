/// What the render thread does after the surface refused a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame draws normally.
    Reconfigured,
    /// Transient error; this frame is not drawn.
    SkipFrame,
    /// Unrecoverable (commonly OOM); the render thread stops.
    Fatal,
}
