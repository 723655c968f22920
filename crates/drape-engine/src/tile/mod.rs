//! Tile identity and eviction descriptors.

mod drop;
mod key;

pub use drop::DropDescriptor;
pub use key::TileKey;
