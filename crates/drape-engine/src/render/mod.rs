//! Render-thread data structures.
//!
//! - `state`: the grouping key for drawables (program + draw settings)
//! - `cache`: GPU-resident tile geometry, indexed by state and by tile
//! - `transform`: projection/model-view matrices shared by every draw in a frame
//! - `backend`: the graphics collaborator contracts the render thread drives

mod backend;
mod cache;
mod state;
mod transform;

pub use backend::{Backend, ContextFactory};
pub use cache::{EntryHandle, TileGeometryCache};
pub use state::{BlendMode, ProgramIndex, RenderState};
pub use transform::{model_view, projection, TransformState, TransformUniforms, HALF_EXTENT};
