//! wgpu implementation of the render-thread backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue on the render thread
//! - creating & configuring the Surface for the viewer window
//! - compiling the tile programs and uploading tile meshes
//! - acquiring, encoding and presenting one surface frame per render frame

mod backend;
mod error;
mod frame;
mod gpu;
mod init;
mod mesh;
mod program;
mod surface;

pub use backend::{WgpuBackend, WgpuContextFactory};
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use mesh::{TileMesh, TileVertex};
pub use program::WgpuProgram;
