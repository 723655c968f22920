use std::collections::{BTreeMap, HashMap};

use crate::tile::TileKey;

use super::RenderState;

/// Stable reference to one cached buffer.
///
/// Handles stay valid across unrelated inserts and erases: they name the group
/// and a never-reused entry id rather than a position in a container.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct EntryHandle {
    state: RenderState,
    id: u64,
}

impl EntryHandle {
    #[inline]
    pub fn state(&self) -> RenderState {
        self.state
    }
}

/// GPU-resident tile geometry, grouped by render state.
///
/// Two structures are kept mutually consistent:
/// - the primary store: `RenderState -> {entry id -> buffer}`, owning every buffer
/// - the reverse index: `TileKey -> [EntryHandle]`, owning nothing
///
/// One tile may own several entries (one per flush); flushing a tile twice never
/// replaces the earlier entry.
///
/// The cache does not know how to free GPU memory. Every removing operation takes
/// a `release` callback that receives each evicted buffer exactly once.
///
/// Complexity:
/// - `insert` / `index_by_tile`: O(log n)
/// - `erase_by_tile`: proportional to the entries of that tile
/// - `erase_all`: O(n)
#[derive(Debug)]
pub struct TileGeometryCache<B> {
    groups: BTreeMap<RenderState, BTreeMap<u64, B>>,
    by_tile: HashMap<TileKey, Vec<EntryHandle>>,
    next_id: u64,
    len: usize,
}

impl<B> Default for TileGeometryCache<B> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
            by_tile: HashMap::new(),
            next_id: 0,
            len: 0,
        }
    }
}

impl<B> TileGeometryCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of owned buffers.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct tiles in the reverse index.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.by_tile.len()
    }

    /// Number of distinct render states with at least one buffer.
    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn contains_tile(&self, key: &TileKey) -> bool {
        self.by_tile.contains_key(key)
    }

    /// Handles recorded for `key`, in flush order.
    pub fn entries_of(&self, key: &TileKey) -> &[EntryHandle] {
        self.by_tile.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, handle: EntryHandle) -> Option<&B> {
        self.groups.get(&handle.state)?.get(&handle.id)
    }

    /// Adds `buffer` to the primary store under `state`.
    ///
    /// The entry is not reachable by tile until [`Self::index_by_tile`] is called
    /// with the returned handle.
    pub fn insert(&mut self, state: RenderState, buffer: B) -> EntryHandle {
        let id = self.next_id;
        self.next_id += 1;

        self.groups.entry(state).or_default().insert(id, buffer);
        self.len += 1;

        EntryHandle { state, id }
    }

    /// Records that `handle` belongs to `key`.
    pub fn index_by_tile(&mut self, key: TileKey, handle: EntryHandle) {
        debug_assert!(self.get(handle).is_some(), "indexing a handle that is not in the store");
        self.by_tile.entry(key).or_default().push(handle);
    }

    /// `insert` + `index_by_tile` in one step.
    pub fn insert_tile(&mut self, key: TileKey, state: RenderState, buffer: B) -> EntryHandle {
        let handle = self.insert(state, buffer);
        self.index_by_tile(key, handle);
        handle
    }

    /// Releases and removes every entry of `key`. Returns how many were removed.
    ///
    /// An unknown key is a no-op.
    pub fn erase_by_tile<F>(&mut self, key: &TileKey, mut release: F) -> usize
    where
        F: FnMut(B),
    {
        let Some(handles) = self.by_tile.get(key) else { return 0 };

        let mut removed = 0;
        for handle in handles {
            let Some(group) = self.groups.get_mut(&handle.state) else { continue };
            if let Some(buffer) = group.remove(&handle.id) {
                release(buffer);
                removed += 1;
            }
            if group.is_empty() {
                self.groups.remove(&handle.state);
            }
        }

        self.by_tile.remove(key);
        self.len -= removed;
        removed
    }

    /// Releases and removes everything. Returns how many buffers were released.
    pub fn erase_all<F>(&mut self, mut release: F) -> usize
    where
        F: FnMut(B),
    {
        let released = self.len;
        for (_, group) in std::mem::take(&mut self.groups) {
            group.into_values().for_each(&mut release);
        }
        self.by_tile.clear();
        self.len = 0;
        released
    }

    /// Iterates groups in state order; each yields its buffers.
    pub fn groups(&self) -> impl Iterator<Item = (&RenderState, impl Iterator<Item = &B>)> {
        self.groups.iter().map(|(state, group)| (state, group.values()))
    }

    /// Checks that the primary store and the reverse index describe the same entries.
    pub fn is_consistent(&self) -> bool {
        let stored: usize = self.groups.values().map(BTreeMap::len).sum();
        if stored != self.len || self.groups.values().any(BTreeMap::is_empty) {
            return false;
        }

        let mut indexed = 0;
        for handles in self.by_tile.values() {
            if handles.is_empty() {
                return false;
            }
            for handle in handles {
                if self.get(*handle).is_none() {
                    return false;
                }
                indexed += 1;
            }
        }
        indexed == self.len
    }
}
