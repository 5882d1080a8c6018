use crate::{Extents, Rect, Region};

/// Fixed per-field delta applied to another rectangle.
///
/// Holds only the offsets; the base is supplied at projection time so the
/// derived rectangle can never drift from its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetDimensions {
    pub offsets: Rect,
}

impl OffsetDimensions {
    pub fn new(offsets: Rect) -> Self {
        Self { offsets }
    }

    /// Inset by one cell on every side.
    pub fn border() -> Self {
        Self::new(Rect::new(1, 1, -2, -2))
    }

    /// Identity projection.
    pub fn none() -> Self {
        Self::default()
    }

    /// `base.field + offset.field` for present fields; absent stays absent.
    pub fn project<E: Extents + ?Sized>(&self, base: &E) -> Region {
        let o = &self.offsets;
        Region {
            x: base.x().map(|v| v + o.x),
            y: base.y().map(|v| v + o.y),
            width: base.width().map(|v| v + o.width),
            height: base.height().map(|v| v + o.height),
        }
    }
}
