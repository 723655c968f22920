//! Windowed viewer: a winit window, the drape render thread drawing into it,
//! and a demo tile producer feeding it geometry.

mod app;
mod config;
mod producer;
mod tiles;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use drape_engine::logging::{init_logging, LoggingConfig};

use crate::app::ViewerApp;
use crate::config::ViewerConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = ViewerApp::new(ViewerConfig::default());

    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;

    app.shutdown()
}
