//! The render thread ("frontend renderer").
//!
//! Responsibilities:
//! - own the tile geometry cache and the frame transform
//! - dispatch inbound [`RenderMessage`](crate::message::RenderMessage)s
//! - redraw every cached buffer each frame
//! - start and stop the dedicated thread that owns the graphics context
//!
//! Nothing here is shared with other threads except through the commutator.

mod config;
mod core;
mod dispatch;
mod frame;
mod metrics;
mod renderer;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RendererConfig;
pub use self::core::RenderCore;
pub use metrics::{FpsReporter, FpsSample, FrameObserver, FrameStats};
pub use renderer::{FrontendRenderer, LifecycleState};
