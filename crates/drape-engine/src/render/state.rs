use core::cmp::Ordering;

/// Index of a GPU program known to the backend's program manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ProgramIndex(pub u32);

impl ProgramIndex {
    /// Flat-colored area geometry (tile fills, polygons).
    pub const SOLID_AREA: ProgramIndex = ProgramIndex(0);
}

/// Fixed-function blending applied with a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Premultiplied-alpha "over".
    Alpha,
}

/// Grouping key for cached geometry: which program draws it and with which settings.
///
/// Ordering rules:
/// 1) `depth_layer`: ascending
/// 2) `program`: ascending
/// 3) `blend`: opaque before alpha
///
/// The order only serves to keep draws sharing a program adjacent; it is not a
/// paint-order guarantee.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderState {
    pub depth_layer: i16,
    pub program: ProgramIndex,
    pub blend: BlendMode,
}

impl RenderState {
    #[inline]
    pub const fn new(program: ProgramIndex) -> Self {
        Self {
            depth_layer: 0,
            program,
            blend: BlendMode::Opaque,
        }
    }

    #[inline]
    pub const fn with_depth_layer(mut self, depth_layer: i16) -> Self {
        self.depth_layer = depth_layer;
        self
    }

    #[inline]
    pub const fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }
}

impl Ord for RenderState {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match self.depth_layer.cmp(&other.depth_layer) {
            Ordering::Equal => match self.program.cmp(&other.program) {
                Ordering::Equal => self.blend.cmp(&other.blend),
                o => o,
            },
            o => o,
        }
    }
}

impl PartialOrd for RenderState {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
