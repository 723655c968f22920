use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};

use crate::coords::Viewport;
use crate::message::{mailbox, Mailbox, MailboxCloser, Poster, RenderMessage, ThreadRole, ThreadsCommutator};
use crate::render::{Backend, ContextFactory};

use super::{FrameObserver, RenderCore, RendererConfig};

/// Lifecycle of a [`FrontendRenderer`].
///
/// `Created -> Running -> StopRequested -> Stopped`; `Stopped` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleState {
    Created,
    Running,
    StopRequested,
    Stopped,
}

/// Owner of the dedicated render thread.
///
/// The thread acquires the graphics context from a [`ContextFactory`], makes it
/// current, and runs frames until cancelled. On its way out it releases every
/// cached buffer and all programs, and only then drops the backend.
///
/// Stopping is cooperative: the cancellation flag is checked once per frame,
/// so the in-flight frame always completes. Dropping a running renderer stops it.
///
/// ```ignore
/// let commutator = Arc::new(ThreadsCommutator::new());
/// let mut renderer = FrontendRenderer::new(Arc::clone(&commutator), RendererConfig::default());
/// renderer.start(WgpuContextFactory::new(window, GpuInit::default()), 1280, 720)?;
/// commutator.post_render(RenderMessage::Rotate { angle: 0.0 });
/// renderer.stop()?;
/// ```
pub struct FrontendRenderer<G>
where
    G: Send + 'static,
{
    commutator: Arc<ThreadsCommutator<G>>,
    config: RendererConfig,
    observer: Option<Box<dyn FrameObserver>>,

    poster: Poster<RenderMessage<G>>,
    mailbox: Option<Mailbox<RenderMessage<G>>>,
    closer: MailboxCloser,

    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<()>>>,
    state: LifecycleState,
}

impl<G> FrontendRenderer<G>
where
    G: Send + 'static,
{
    pub fn new(commutator: Arc<ThreadsCommutator<G>>, config: RendererConfig) -> Self {
        let (poster, mailbox, closer) = mailbox();
        Self {
            commutator,
            config,
            observer: None,
            poster,
            mailbox: Some(mailbox),
            closer,
            cancel: Arc::new(AtomicBool::new(false)),
            handle: None,
            state: LifecycleState::Created,
        }
    }

    /// Installs a per-frame observer. Only effective before [`Self::start`].
    pub fn with_observer(mut self, observer: impl FrameObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// `true` once the render thread has exited, for whatever reason.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Registers with the commutator, computes the initial transform for
    /// `width` x `height`, and spawns the render thread.
    pub fn start<F>(&mut self, factory: F, width: u32, height: u32) -> Result<()>
    where
        F: ContextFactory,
        F::Backend: Backend<Buffer = G>,
    {
        anyhow::ensure!(
            self.state == LifecycleState::Created,
            "render thread cannot start from {:?}",
            self.state
        );
        let mailbox = self.mailbox.take().context("render mailbox already consumed")?;

        self.commutator.register_render(self.poster.clone());

        let core = RenderCore::new(
            Arc::clone(&self.commutator),
            Viewport::new(width, height),
            self.config.clone(),
            self.observer.take(),
        );
        let cancel = Arc::clone(&self.cancel);

        let spawned = thread::Builder::new()
            .name(self.config.thread_name.clone())
            .spawn(move || render_thread_main(factory, core, mailbox, cancel));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state = LifecycleState::Running;
                log::info!("render thread started ({width}x{height})");
                Ok(())
            }
            Err(err) => {
                self.commutator.unregister(ThreadRole::Render);
                self.closer.close();
                self.state = LifecycleState::Stopped;
                Err(err).context("failed to spawn render thread")
            }
        }
    }

    /// Requests cancellation, closes the inbound mailbox and joins the thread.
    ///
    /// Returns the error that ended the thread, if any. Idempotent: later calls
    /// return `Ok(())`.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            LifecycleState::Stopped => return Ok(()),
            LifecycleState::Created => {
                self.closer.close();
                self.state = LifecycleState::Stopped;
                return Ok(());
            }
            LifecycleState::Running | LifecycleState::StopRequested => {}
        }

        self.state = LifecycleState::StopRequested;
        self.cancel.store(true, Ordering::Release);
        self.commutator.unregister(ThreadRole::Render);
        self.closer.close();

        let result = match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(_) => Err(anyhow!("render thread panicked")),
            },
            None => Ok(()),
        };

        self.state = LifecycleState::Stopped;
        result
    }
}

impl<G> Drop for FrontendRenderer<G>
where
    G: Send + 'static,
{
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("render thread ended with error: {err:#}");
        }
    }
}

impl<G> std::fmt::Debug for FrontendRenderer<G>
where
    G: Send + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontendRenderer")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Body of the render thread.
///
/// Teardown order on exit: cached buffers, programs, queued messages, then the
/// backend itself (which tears down the graphics context).
fn render_thread_main<F, G>(
    factory: F,
    mut core: RenderCore<G>,
    mailbox: Mailbox<RenderMessage<G>>,
    cancel: Arc<AtomicBool>,
) -> Result<()>
where
    F: ContextFactory,
    F::Backend: Backend<Buffer = G>,
    G: Send + 'static,
{
    let mut backend = factory
        .acquire_draw_context()
        .context("failed to acquire draw context")?;
    backend
        .make_current()
        .context("failed to make draw context current")?;

    log::debug!("render thread entered frame loop");

    let mut outcome = Ok(());
    while !cancel.load(Ordering::Acquire) {
        if let Err(err) = core.run_frame(&mut backend, &mailbox) {
            log::error!("render thread stopping after frame failure: {err:#}");
            outcome = Err(err);
            break;
        }
    }

    core.release_resources(&mut backend);

    let dropped = mailbox.drain();
    if dropped > 0 {
        log::debug!("render thread discarded {dropped} undelivered message(s)");
    }

    drop(backend);
    log::info!("render thread stopped");
    outcome
}
