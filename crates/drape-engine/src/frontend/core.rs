use std::sync::Arc;

use crate::coords::Viewport;
use crate::message::ThreadsCommutator;
use crate::render::{Backend, TileGeometryCache, TransformState};
use crate::time::FrameClock;

use super::{FrameObserver, RendererConfig};

/// State owned by the render thread: cache, transform and frame bookkeeping.
///
/// Normally driven by [`FrontendRenderer`](super::FrontendRenderer) on its own
/// thread; it can also be driven directly on any single thread that owns a
/// backend. It is never shared: every method takes `&mut self` or is called
/// from the owning thread.
///
/// `G` is the backend's geometry buffer type.
pub struct RenderCore<G> {
    pub(super) cache: TileGeometryCache<G>,
    pub(super) transform: TransformState,
    pub(super) commutator: Arc<ThreadsCommutator<G>>,
    pub(super) config: RendererConfig,
    pub(super) clock: FrameClock,
    pub(super) observer: Option<Box<dyn FrameObserver>>,
}

impl<G> RenderCore<G>
where
    G: Send + 'static,
{
    /// Creates the core with the initial projection for `viewport` and a zero heading.
    pub fn new(
        commutator: Arc<ThreadsCommutator<G>>,
        viewport: Viewport,
        config: RendererConfig,
        observer: Option<Box<dyn FrameObserver>>,
    ) -> Self {
        Self {
            cache: TileGeometryCache::new(),
            transform: TransformState::new(viewport),
            commutator,
            config,
            clock: FrameClock::new(),
            observer,
        }
    }

    #[inline]
    pub fn cache(&self) -> &TileGeometryCache<G> {
        &self.cache
    }

    #[inline]
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Releases every cached buffer and then the backend's programs.
    ///
    /// Must run on the render thread before the backend is dropped.
    pub fn release_resources<B>(&mut self, backend: &mut B)
    where
        B: Backend<Buffer = G>,
    {
        let released = self.cache.erase_all(|buffer| backend.release_buffer(buffer));
        backend.release_programs();
        log::debug!("render thread released {released} buffer(s) and all programs");
    }
}

impl<G> std::fmt::Debug for RenderCore<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCore")
            .field("buffers", &self.cache.len())
            .field("tiles", &self.cache.tile_count())
            .field("transform", &self.transform)
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
