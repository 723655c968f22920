use anyhow::{Context, Result};

use crate::coords::Viewport;
use crate::message::{RenderMessage, UploadMessage};
use crate::render::Backend;
use crate::tile::DropDescriptor;

use super::RenderCore;

impl<G> RenderCore<G>
where
    G: Send + 'static,
{
    /// Applies one inbound message.
    ///
    /// # Panics
    /// Panics on a `DropTiles` message whose explicit tile list is empty: the
    /// producer and the render thread disagree about the protocol.
    ///
    /// # Errors
    /// Backend failures (missing program, failed upload) are returned as-is;
    /// the caller treats them as fatal for the session.
    pub fn accept_message<B>(&mut self, backend: &mut B, msg: RenderMessage<G>) -> Result<()>
    where
        B: Backend<Buffer = G>,
    {
        log::trace!("render thread: {} message", msg.kind());

        match msg {
            RenderMessage::Flush { state, tile, mut buffer } => {
                let program = backend
                    .program(state.program)
                    .with_context(|| format!("no program for {:?}", state.program))?;
                backend.bind_program(&program)?;
                backend
                    .build_buffer(&mut buffer, &program)
                    .with_context(|| format!("failed to build geometry for tile {tile}"))?;

                self.cache.insert_tile(tile, state, buffer);
            }

            RenderMessage::DropTiles(descriptor) => {
                assert!(!descriptor.is_empty(), "DropTiles message names no tiles");

                match descriptor {
                    DropDescriptor::All => {
                        let released = self.cache.erase_all(|b| backend.release_buffer(b));
                        log::debug!("dropped all tiles ({released} buffer(s))");
                    }
                    DropDescriptor::Tiles(tiles) => {
                        let mut released = 0;
                        for tile in &tiles {
                            released += self.cache.erase_by_tile(tile, |b| backend.release_buffer(b));
                        }
                        log::debug!("dropped {} tile(s) ({released} buffer(s))", tiles.len());
                    }
                }
            }

            RenderMessage::Resize { width, height } => {
                self.transform.resize(Viewport::new(width, height));
            }

            RenderMessage::Rotate { angle } => {
                self.transform.rotate(angle);

                let screen = self.transform.screen_transform();
                self.commutator
                    .post_upload(UploadMessage::UpdateCoverage(screen));
            }
        }

        Ok(())
    }
}
