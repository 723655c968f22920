use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use drape_engine::coords::ScreenTransform;
use drape_engine::device::TileMesh;
use drape_engine::message::{
    mailbox, Mailbox, MailboxCloser, RenderMessage, ThreadRole, ThreadsCommutator, UploadMessage,
};
use drape_engine::tile::{DropDescriptor, TileKey};

use crate::tiles::{TileGrid, BORDER_STATE, FILL_STATE};

/// Tiles that entered and left coverage after a screen change.
#[derive(Debug, Default, PartialEq)]
pub struct CoverageDiff {
    pub dropped: Vec<TileKey>,
    pub added: Vec<TileKey>,
}

/// Tiles currently resident on the render thread.
#[derive(Debug)]
pub struct Coverage {
    grid: TileGrid,
    resident: BTreeSet<TileKey>,
}

impl Coverage {
    pub fn new(grid: TileGrid) -> Self {
        Self {
            grid,
            resident: BTreeSet::new(),
        }
    }

    /// Recomputes the needed tile set for `screen` and returns the difference.
    pub fn update(&mut self, screen: &ScreenTransform) -> CoverageDiff {
        let needed: BTreeSet<TileKey> = self.grid.covering(screen.global_bounds()).into_iter().collect();

        let diff = CoverageDiff {
            dropped: self.resident.difference(&needed).copied().collect(),
            added: needed.difference(&self.resident).copied().collect(),
        };
        self.resident = needed;
        diff
    }

    #[inline]
    pub fn resident(&self) -> usize {
        self.resident.len()
    }
}

/// Demo tile producer ("resource upload" thread).
///
/// Blocks on its mailbox for coverage updates. For each one it drops the tiles
/// that left the screen and flushes fill and border meshes for new tiles.
pub struct TileProducer {
    commutator: Arc<ThreadsCommutator<TileMesh>>,
    closer: MailboxCloser,
    handle: Option<JoinHandle<()>>,
}

impl TileProducer {
    pub fn start(commutator: Arc<ThreadsCommutator<TileMesh>>, grid: TileGrid) -> Result<Self> {
        let (poster, mailbox, closer) = mailbox();
        commutator.register_upload(poster);

        let render = Arc::clone(&commutator);
        let handle = thread::Builder::new()
            .name("drape-tiles".to_string())
            .spawn(move || producer_main(&render, mailbox, Coverage::new(grid)))
            .context("failed to spawn tile producer thread")?;

        Ok(Self {
            commutator,
            closer,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else { return };

        self.commutator.unregister(ThreadRole::ResourceUpload);
        self.closer.close();
        if handle.join().is_err() {
            log::error!("tile producer panicked");
        }
    }
}

impl Drop for TileProducer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn producer_main(
    commutator: &ThreadsCommutator<TileMesh>,
    mailbox: Mailbox<UploadMessage>,
    mut coverage: Coverage,
) {
    log::debug!("tile producer started");

    while let Some(msg) = mailbox.recv() {
        match msg {
            UploadMessage::UpdateCoverage(screen) => {
                let diff = coverage.update(&screen);
                if !publish(commutator, &coverage.grid, diff) {
                    log::debug!("render thread gone; tile producer idle");
                }
            }
        }
    }

    log::debug!("tile producer stopped ({} tiles resident)", coverage.resident());
}

/// Posts the drops and flushes of `diff`. Returns `false` once the render
/// thread stops accepting messages.
fn publish(commutator: &ThreadsCommutator<TileMesh>, grid: &TileGrid, diff: CoverageDiff) -> bool {
    if !diff.dropped.is_empty() {
        let count = diff.dropped.len();
        if !commutator.post_render(RenderMessage::DropTiles(DropDescriptor::Tiles(diff.dropped))) {
            return false;
        }
        log::debug!("dropped {count} tile(s)");
    }

    for tile in diff.added {
        let fill = RenderMessage::Flush {
            state: FILL_STATE,
            tile,
            buffer: grid.fill_mesh(tile),
        };
        let border = RenderMessage::Flush {
            state: BORDER_STATE,
            tile,
            buffer: grid.border_mesh(tile),
        };
        if !(commutator.post_render(fill) && commutator.post_render(border)) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use drape_engine::coords::Viewport;

    use super::*;

    fn grid() -> TileGrid {
        TileGrid {
            world_size: 400.0,
            zoom: 4,
            border: 0.5,
        }
    }

    #[test]
    fn first_update_adds_everything() {
        let mut coverage = Coverage::new(grid());
        let diff = coverage.update(&ScreenTransform::new(Viewport::new(100, 100), 0.0));

        // 25-unit tiles over a ±25 square.
        assert!(diff.dropped.is_empty());
        assert_eq!(diff.added.len(), 4);
        assert_eq!(coverage.resident(), 4);
    }

    #[test]
    fn rotation_grows_coverage_and_unrotating_drops_it() {
        let mut coverage = Coverage::new(grid());
        let vp = Viewport::new(100, 100);
        coverage.update(&ScreenTransform::new(vp, 0.0));

        let tilted = coverage.update(&ScreenTransform::new(vp, std::f32::consts::FRAC_PI_4));
        assert!(tilted.dropped.is_empty());
        assert_eq!(tilted.added.len(), 12);

        let back = coverage.update(&ScreenTransform::new(vp, 0.0));
        assert_eq!(back.dropped.len(), 12);
        assert!(back.added.is_empty());

        assert_eq!(coverage.update(&ScreenTransform::new(vp, 0.0)), CoverageDiff::default());
    }

    #[test]
    fn producer_answers_coverage_updates_with_render_messages() {
        let commutator = Arc::new(ThreadsCommutator::new());
        let (poster, render_inbox, _closer) = mailbox();
        commutator.register_render(poster);

        let mut producer = TileProducer::start(Arc::clone(&commutator), grid()).unwrap();
        assert!(commutator.post_upload(UploadMessage::UpdateCoverage(ScreenTransform::new(
            Viewport::new(100, 100),
            0.0
        ))));

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let mut flushes = Vec::new();
        while flushes.len() < 8 {
            assert!(std::time::Instant::now() < deadline, "producer did not flush");
            std::thread::sleep(Duration::from_millis(2));
            while let Some(msg) = render_inbox.try_recv() {
                match msg {
                    RenderMessage::Flush { state, tile, .. } => flushes.push((state, tile)),
                    other => panic!("unexpected {}", other.kind()),
                }
            }
        }

        assert_eq!(flushes.iter().filter(|(s, _)| *s == FILL_STATE).count(), 4);
        assert_eq!(flushes.iter().filter(|(s, _)| *s == BORDER_STATE).count(), 4);

        producer.stop();
        assert!(!commutator.is_registered(ThreadRole::ResourceUpload));
    }
}
