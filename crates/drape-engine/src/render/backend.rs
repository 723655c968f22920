use std::rc::Rc;

use anyhow::Result;

use crate::coords::{ColorRgba, Viewport};

use super::{ProgramIndex, RenderState, TransformUniforms};

/// Produces the graphics backend on the render thread.
///
/// The factory is created wherever it is convenient (usually the UI thread) and
/// moved into the render thread, which is the only place
/// [`ContextFactory::acquire_draw_context`] is called. The returned backend never
/// leaves that thread.
pub trait ContextFactory: Send + 'static {
    type Backend: Backend;

    fn acquire_draw_context(self) -> Result<Self::Backend>;
}

/// Graphics collaborator driven by the render thread.
///
/// Groups three roles:
/// - draw context: target binding, clearing and presentation
/// - program manager: shared program handles and their per-draw inputs
/// - buffer operations: upload, draw and release of tile geometry
///
/// All calls happen on the thread that called [`Backend::make_current`].
pub trait Backend {
    /// Compiled GPU program, shared between every cache entry that uses it.
    type Program;

    /// Tile geometry. Built off-thread by producers, moved into the render
    /// thread inside a flush message, uploaded there by [`Backend::build_buffer`].
    type Buffer: Send + 'static;

    // ── draw context ──────────────────────────────────────────────────────

    /// Binds the context to the calling thread.
    fn make_current(&mut self) -> Result<()>;

    /// Binds the default draw target and sizes it to `viewport`.
    fn set_default_target(&mut self, viewport: Viewport) -> Result<()>;

    fn clear(&mut self, color: ColorRgba) -> Result<()>;

    fn present(&mut self) -> Result<()>;

    // ── program manager ───────────────────────────────────────────────────

    fn program(&mut self, index: ProgramIndex) -> Result<Rc<Self::Program>>;

    fn bind_program(&mut self, program: &Rc<Self::Program>) -> Result<()>;

    /// Applies the fixed-function settings of `state` for the bound program.
    fn apply_state(&mut self, state: &RenderState, program: &Self::Program) -> Result<()>;

    /// Uploads the frame-wide transform inputs of the bound program.
    fn apply_uniforms(&mut self, uniforms: &TransformUniforms, program: &Self::Program) -> Result<()>;

    /// Destroys every program. Called once, during teardown.
    fn release_programs(&mut self);

    // ── buffers ───────────────────────────────────────────────────────────

    /// Uploads `buffer` against `program`. Called exactly once per buffer,
    /// before its first draw.
    fn build_buffer(&mut self, buffer: &mut Self::Buffer, program: &Self::Program) -> Result<()>;

    fn render_buffer(&mut self, buffer: &Self::Buffer) -> Result<()>;

    /// Frees the GPU side of `buffer`. Taking it by value makes a second
    /// release of the same buffer impossible.
    fn release_buffer(&mut self, buffer: Self::Buffer);
}
