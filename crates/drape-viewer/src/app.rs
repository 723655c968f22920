use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use drape_engine::device::{TileMesh, WgpuContextFactory};
use drape_engine::frontend::{FpsReporter, FrontendRenderer};
use drape_engine::message::{RenderMessage, ThreadsCommutator};

use crate::config::ViewerConfig;
use crate::producer::TileProducer;

/// What a key press asks the viewer to do.
#[derive(Debug, Copy, Clone, PartialEq)]
enum KeyAction {
    Rotate(f32),
    ResetHeading,
    Exit,
}

fn key_action(code: KeyCode, step: f32) -> Option<KeyAction> {
    match code {
        KeyCode::ArrowLeft => Some(KeyAction::Rotate(step)),
        KeyCode::ArrowRight => Some(KeyAction::Rotate(-step)),
        KeyCode::KeyR => Some(KeyAction::ResetHeading),
        KeyCode::Escape => Some(KeyAction::Exit),
        _ => None,
    }
}

struct Running {
    window: Arc<Window>,
    renderer: FrontendRenderer<TileMesh>,
    producer: TileProducer,
}

/// winit application driving one window.
///
/// The UI thread only posts messages; all GPU work happens on the render thread.
pub struct ViewerApp {
    config: ViewerConfig,
    commutator: Arc<ThreadsCommutator<TileMesh>>,
    running: Option<Running>,
    angle: f32,
    result: Result<()>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            commutator: Arc::new(ThreadsCommutator::new()),
            running: None,
            angle: 0.0,
            result: Ok(()),
        }
    }

    fn launch(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let producer = TileProducer::start(Arc::clone(&self.commutator), self.config.grid)?;

        let mut renderer = FrontendRenderer::new(Arc::clone(&self.commutator), self.config.renderer.clone())
            .with_observer(FpsReporter::new());
        let size = window.inner_size();
        let factory = WgpuContextFactory::new(Arc::clone(&window), self.config.gpu.clone());
        renderer.start(factory, size.width, size.height)?;

        // Kick off initial coverage; the render thread answers with a coverage update.
        self.commutator.post_render(RenderMessage::Rotate { angle: self.angle });

        self.running = Some(Running {
            window,
            renderer,
            producer,
        });
        Ok(())
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else { return };
        let Some(action) = key_action(code, self.config.rotate_step) else { return };

        match action {
            KeyAction::Rotate(delta) => self.angle += delta,
            KeyAction::ResetHeading => self.angle = 0.0,
            KeyAction::Exit => {
                event_loop.exit();
                return;
            }
        }
        self.commutator.post_render(RenderMessage::Rotate { angle: self.angle });
    }

    /// Stops the render thread, then the producer. Returns the first error seen.
    pub fn shutdown(&mut self) -> Result<()> {
        if let Some(mut running) = self.running.take() {
            let stopped = running.renderer.stop();
            running.producer.stop();
            drop(running.window);
            if let Err(err) = stopped {
                log::error!("render thread: {err:#}");
                if self.result.is_ok() {
                    self.result = Err(err);
                }
            }
        }
        std::mem::replace(&mut self.result, Ok(()))
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        if let Err(e) = self.launch(event_loop) {
            log::error!("failed to start viewer: {e:#}");
            self.result = Err(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // The render thread exits on its own only after a failure.
        if self.running.as_ref().is_some_and(|r| r.renderer.is_finished()) {
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_ref() else { return };
        if running.window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.commutator.post_render(RenderMessage::Resize {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = running.window.inner_size();
                self.commutator.post_render(RenderMessage::Resize {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, &event),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(err) = self.shutdown() {
            self.result = Err(err);
        }
    }
}
