use crate::coords::ColorRgba;

/// Render thread configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Background the default target is cleared to every frame.
    pub clear_color: ColorRgba,

    /// Upper bound on inbound messages dispatched per frame.
    ///
    /// Bounds per-frame work at the cost of latency when producers outrun the
    /// frame rate; the backlog stays in the mailbox. Zero is treated as one.
    pub messages_per_frame: usize,

    /// Name of the spawned OS thread.
    pub thread_name: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: ColorRgba::map_background(),
            messages_per_frame: 1,
            thread_name: "drape-render".to_string(),
        }
    }
}
