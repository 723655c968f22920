//! Drape engine crate.
//!
//! This crate owns the render thread of the map viewer: the GPU-resident tile
//! geometry cache, the message protocol spoken with the tile producer, and the
//! wgpu backend that executes draws.

pub mod coords;
pub mod device;
pub mod frontend;
pub mod logging;
pub mod message;
pub mod render;
pub mod tile;
pub mod time;
