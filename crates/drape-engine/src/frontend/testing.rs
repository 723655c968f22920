//! Recording backend used by the render-thread tests.

use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use anyhow::{bail, Result};
use crossbeam_channel::Sender;

use crate::coords::{ColorRgba, Viewport};
use crate::render::{Backend, ContextFactory, ProgramIndex, RenderState, TransformUniforms};

/// One collaborator call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    MakeCurrent,
    SetDefaultTarget(Viewport),
    Clear,
    Present,
    Program(ProgramIndex),
    BindProgram(ProgramIndex),
    ApplyState(RenderState),
    ApplyUniforms(TransformUniforms),
    ReleasePrograms,
    Build(u32),
    Render(u32),
    Release(u32),
    ContextDropped,
}

/// Shared, thread-safe call log.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    pub(crate) fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(*c)).count()
    }

    /// Ids passed to `release_buffer`, in call order.
    pub(crate) fn released(&self) -> Vec<u32> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::Release(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct MockBuffer {
    pub(crate) id: u32,
    built: bool,
}

impl MockBuffer {
    pub(crate) fn new(id: u32) -> Self {
        Self { id, built: false }
    }
}

#[derive(Debug)]
pub(crate) struct MockProgram {
    index: ProgramIndex,
}

/// Backend that records every call and checks the thread-affinity and
/// build-before-draw contracts.
pub(crate) struct RecordingBackend {
    journal: Journal,
    presents: Option<Sender<u64>>,
    frames: u64,
    failing_render: Option<u32>,
    owner: Option<ThreadId>,
}

impl RecordingBackend {
    pub(crate) fn new(journal: Journal) -> Self {
        Self {
            journal,
            presents: None,
            frames: 0,
            failing_render: None,
            owner: None,
        }
    }

    /// Makes `render_buffer` fail for the buffer with `id`.
    pub(crate) fn failing_render(mut self, id: u32) -> Self {
        self.failing_render = Some(id);
        self
    }

    fn check_thread(&self) {
        if let Some(owner) = self.owner {
            assert_eq!(owner, thread::current().id(), "backend used off its thread");
        }
    }
}

impl Backend for RecordingBackend {
    type Program = MockProgram;
    type Buffer = MockBuffer;

    fn make_current(&mut self) -> Result<()> {
        self.owner = Some(thread::current().id());
        self.journal.push(Call::MakeCurrent);
        Ok(())
    }

    fn set_default_target(&mut self, viewport: Viewport) -> Result<()> {
        self.check_thread();
        self.journal.push(Call::SetDefaultTarget(viewport));
        Ok(())
    }

    fn clear(&mut self, _color: ColorRgba) -> Result<()> {
        self.journal.push(Call::Clear);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.check_thread();
        self.journal.push(Call::Present);
        self.frames += 1;
        if let Some(tx) = &self.presents {
            let _ = tx.send(self.frames);
        }
        Ok(())
    }

    fn program(&mut self, index: ProgramIndex) -> Result<Rc<MockProgram>> {
        self.journal.push(Call::Program(index));
        if index != ProgramIndex::SOLID_AREA {
            bail!("unknown program {index:?}");
        }
        Ok(Rc::new(MockProgram { index }))
    }

    fn bind_program(&mut self, program: &Rc<MockProgram>) -> Result<()> {
        self.journal.push(Call::BindProgram(program.index));
        Ok(())
    }

    fn apply_state(&mut self, state: &RenderState, _program: &MockProgram) -> Result<()> {
        self.journal.push(Call::ApplyState(*state));
        Ok(())
    }

    fn apply_uniforms(&mut self, uniforms: &TransformUniforms, _program: &MockProgram) -> Result<()> {
        self.journal.push(Call::ApplyUniforms(*uniforms));
        Ok(())
    }

    fn release_programs(&mut self) {
        self.check_thread();
        self.journal.push(Call::ReleasePrograms);
    }

    fn build_buffer(&mut self, buffer: &mut MockBuffer, _program: &MockProgram) -> Result<()> {
        self.check_thread();
        assert!(!buffer.built, "buffer {} built twice", buffer.id);
        buffer.built = true;
        self.journal.push(Call::Build(buffer.id));
        Ok(())
    }

    fn render_buffer(&mut self, buffer: &MockBuffer) -> Result<()> {
        assert!(buffer.built, "buffer {} drawn before build", buffer.id);
        if self.failing_render == Some(buffer.id) {
            bail!("simulated draw failure for buffer {}", buffer.id);
        }
        self.journal.push(Call::Render(buffer.id));
        Ok(())
    }

    fn release_buffer(&mut self, buffer: MockBuffer) {
        self.check_thread();
        self.journal.push(Call::Release(buffer.id));
    }
}

impl Drop for RecordingBackend {
    fn drop(&mut self) {
        self.journal.push(Call::ContextDropped);
    }
}

/// Factory handing a [`RecordingBackend`] to the render thread.
pub(crate) struct RecordingFactory {
    pub(crate) journal: Journal,
    /// Receives the running frame count after every present.
    pub(crate) presents: Sender<u64>,
    pub(crate) failing_render: Option<u32>,
    pub(crate) fail_acquire: bool,
}

impl ContextFactory for RecordingFactory {
    type Backend = RecordingBackend;

    fn acquire_draw_context(self) -> Result<RecordingBackend> {
        if self.fail_acquire {
            bail!("no display");
        }
        let mut backend = RecordingBackend::new(self.journal);
        backend.presents = Some(self.presents);
        backend.failing_render = self.failing_render;
        Ok(backend)
    }
}
