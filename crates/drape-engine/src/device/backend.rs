use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use anyhow::{bail, ensure, Context, Result};
use winit::window::Window;

use crate::coords::{ColorRgba, Viewport};
use crate::render::{Backend, BlendMode, ContextFactory, ProgramIndex, RenderState, TransformUniforms};

use super::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction, TileMesh, WgpuProgram};

/// Moves the window handle into the render thread and builds the wgpu backend there.
#[derive(Debug, Clone)]
pub struct WgpuContextFactory {
    pub window: Arc<Window>,
    pub init: GpuInit,
}

impl WgpuContextFactory {
    pub fn new(window: Arc<Window>, init: GpuInit) -> Self {
        Self { window, init }
    }
}

impl ContextFactory for WgpuContextFactory {
    type Backend = WgpuBackend;

    fn acquire_draw_context(self) -> Result<WgpuBackend> {
        let gpu = pollster::block_on(Gpu::new(self.window, self.init))?;
        Ok(WgpuBackend::new(gpu))
    }
}

/// [`Backend`] over a wgpu surface.
///
/// A frame is acquired by `set_default_target` and presented by `present`.
/// When the surface skips a frame, every draw call of that frame is a no-op.
pub struct WgpuBackend {
    gpu: Gpu,
    programs: HashMap<ProgramIndex, Rc<WgpuProgram>>,
    bound: Option<Rc<WgpuProgram>>,
    blend: BlendMode,
    frame: Option<GpuFrame>,
    owner: Option<ThreadId>,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu) -> Self {
        Self {
            gpu,
            programs: HashMap::new(),
            bound: None,
            blend: BlendMode::default(),
            frame: None,
            owner: None,
        }
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn check_thread(&self) -> Result<()> {
        ensure!(
            self.owner == Some(thread::current().id()),
            "wgpu backend used off the thread it was made current on"
        );
        Ok(())
    }

    fn color_attachment(view: &wgpu::TextureView, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPassColorAttachment<'_> {
        wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }
}

impl Backend for WgpuBackend {
    type Program = WgpuProgram;
    type Buffer = TileMesh;

    fn make_current(&mut self) -> Result<()> {
        self.owner = Some(thread::current().id());
        log::debug!("wgpu backend bound to {:?}", thread::current().name());
        Ok(())
    }

    fn set_default_target(&mut self, viewport: Viewport) -> Result<()> {
        self.check_thread()?;
        self.gpu.resize(viewport);

        // A frame left over from an aborted loop iteration is discarded unpresented.
        self.frame = None;

        match self.gpu.begin_frame() {
            Ok(frame) => self.frame = Some(frame),
            Err(err) => match self.gpu.handle_surface_error(&err) {
                SurfaceErrorAction::Fatal => bail!("surface error: {err}"),
                action => log::debug!("surface error {err}: {action:?}"),
            },
        }
        Ok(())
    }

    fn clear(&mut self, color: ColorRgba) -> Result<()> {
        let Some(frame) = self.frame.as_mut() else { return Ok(()) };

        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("drape clear pass"),
            color_attachments: &[Some(Self::color_attachment(
                &frame.view,
                wgpu::LoadOp::Clear(color.to_wgpu()),
            ))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.check_thread()?;
        if let Some(frame) = self.frame.take() {
            self.gpu.submit(frame);
        }
        Ok(())
    }

    fn program(&mut self, index: ProgramIndex) -> Result<Rc<WgpuProgram>> {
        if let Some(program) = self.programs.get(&index) {
            return Ok(Rc::clone(program));
        }

        let program = Rc::new(WgpuProgram::new(
            self.gpu.device(),
            self.gpu.surface_format(),
            index,
        )?);
        self.programs.insert(index, Rc::clone(&program));
        Ok(program)
    }

    fn bind_program(&mut self, program: &Rc<WgpuProgram>) -> Result<()> {
        self.bound = Some(Rc::clone(program));
        Ok(())
    }

    fn apply_state(&mut self, state: &RenderState, _program: &WgpuProgram) -> Result<()> {
        self.blend = state.blend;
        Ok(())
    }

    fn apply_uniforms(&mut self, uniforms: &TransformUniforms, program: &WgpuProgram) -> Result<()> {
        program.write_uniforms(self.gpu.queue(), uniforms);
        Ok(())
    }

    fn release_programs(&mut self) {
        self.bound = None;
        for program in self.programs.values() {
            program.destroy();
        }
        let released = self.programs.len();
        self.programs.clear();
        log::debug!("released {released} program(s)");
    }

    fn build_buffer(&mut self, buffer: &mut TileMesh, _program: &WgpuProgram) -> Result<()> {
        self.check_thread()?;
        buffer.upload(self.gpu.device())
    }

    fn render_buffer(&mut self, buffer: &TileMesh) -> Result<()> {
        let Some(frame) = self.frame.as_mut() else { return Ok(()) };
        let program = self
            .bound
            .as_ref()
            .context("render_buffer called with no program bound")?;
        if !buffer.is_uploaded() {
            return Ok(());
        }

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("drape tile pass"),
            color_attachments: &[Some(Self::color_attachment(&frame.view, wgpu::LoadOp::Load))],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(program.pipeline(self.blend));
        pass.set_bind_group(0, program.bind_group(), &[]);
        buffer.draw(&mut pass);
        Ok(())
    }

    fn release_buffer(&mut self, buffer: TileMesh) {
        buffer.release();
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        self.frame = None;
        log::debug!("wgpu context dropped");
    }
}

impl std::fmt::Debug for WgpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuBackend")
            .field("gpu", &self.gpu)
            .field("programs", &self.programs.len())
            .field("frame", &self.frame.is_some())
            .finish()
    }
}
