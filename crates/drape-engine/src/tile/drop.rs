use super::TileKey;

/// What a `DropTiles` message evicts.
///
/// Either an explicit list of tiles or everything; the enum makes "both"
/// unrepresentable. An explicit list must not be empty: the render thread
/// treats `Tiles(vec![])` as a protocol violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDescriptor {
    Tiles(Vec<TileKey>),
    All,
}

impl DropDescriptor {
    /// Collects `tiles` into an explicit drop list.
    pub fn tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = TileKey>,
    {
        DropDescriptor::Tiles(tiles.into_iter().collect())
    }

    #[inline]
    pub fn all() -> Self {
        DropDescriptor::All
    }

    /// `true` when the descriptor names nothing to drop.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, DropDescriptor::Tiles(t) if t.is_empty())
    }

    #[inline]
    pub fn drops_all(&self) -> bool {
        matches!(self, DropDescriptor::All)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_only_for_empty_list() {
        assert!(DropDescriptor::tiles(Vec::new()).is_empty());
        assert!(!DropDescriptor::tiles([TileKey::new(0, 0, 0)]).is_empty());
        assert!(!DropDescriptor::all().is_empty());
    }

    #[test]
    fn drops_all_only_for_all() {
        assert!(DropDescriptor::all().drops_all());
        assert!(!DropDescriptor::tiles([TileKey::new(0, 0, 0)]).drops_all());
    }
}
