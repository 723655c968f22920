use std::time::Instant;

use anyhow::{Context, Result};

use crate::message::{Mailbox, RenderMessage};
use crate::render::Backend;

use super::{FrameStats, RenderCore};

impl<G> RenderCore<G>
where
    G: Send + 'static,
{
    /// Runs one frame: dispatch pending messages, clear, draw the cache, present.
    ///
    /// At most `messages_per_frame` messages are taken from `mailbox`; the rest
    /// wait for later frames. Any error aborts the frame without rollback.
    pub fn run_frame<B>(&mut self, backend: &mut B, mailbox: &Mailbox<RenderMessage<G>>) -> Result<()>
    where
        B: Backend<Buffer = G>,
    {
        let started = Instant::now();

        let messages_handled = self.process_messages(backend, mailbox)?;

        backend
            .set_default_target(self.transform.viewport())
            .context("failed to bind default draw target")?;
        backend.clear(self.config.clear_color)?;

        let buffers_drawn = self.render_scene(backend)?;

        backend.present().context("failed to present frame")?;

        let time = self.clock.tick();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_frame(&FrameStats {
                frame_index: time.frame_index,
                dt: time.dt,
                frame_time: time.now.saturating_duration_since(started),
                now: time.now,
                messages_handled,
                buffers_drawn,
                cached_tiles: self.cache.tile_count(),
            });
        }

        Ok(())
    }

    /// Draws every cached buffer with the current transform. Returns the draw count.
    ///
    /// The program of each render-state group is bound once, followed by that
    /// state's settings and the frame uniforms; then each buffer of the group is drawn.
    pub fn render_scene<B>(&self, backend: &mut B) -> Result<usize>
    where
        B: Backend<Buffer = G>,
    {
        let uniforms = self.transform.uniforms();
        let mut drawn = 0;

        for (state, buffers) in self.cache.groups() {
            let program = backend.program(state.program)?;
            backend.bind_program(&program)?;
            backend.apply_state(state, &program)?;
            backend.apply_uniforms(&uniforms, &program)?;

            for buffer in buffers {
                backend.render_buffer(buffer)?;
                drawn += 1;
            }
        }

        Ok(drawn)
    }

    fn process_messages<B>(&mut self, backend: &mut B, mailbox: &Mailbox<RenderMessage<G>>) -> Result<usize>
    where
        B: Backend<Buffer = G>,
    {
        let budget = self.config.messages_per_frame.max(1);
        let mut handled = 0;

        while handled < budget {
            let Some(msg) = mailbox.try_recv() else { break };
            self.accept_message(backend, msg)?;
            handled += 1;
        }

        Ok(handled)
    }
}
