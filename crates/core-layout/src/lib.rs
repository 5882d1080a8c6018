//! Window geometry: desired rectangles, constraint resolution and offset
//! projection.
//!
//! A window declares a `Dimensions` (each field absent, absolute cells, or a
//! fraction of the parent). `ConstrainedDimensions` pairs that declaration with
//! a concrete parent `Rect` and resolves fields on demand, so a resize only has
//! to replace the parent bounds. `OffsetDimensions` derives a second rectangle
//! (typically the inside of a border) from anything implementing `Extents`.
//!
//! Invariants:
//! * Nothing resolved is cached; every accessor recomputes from base + parent.
//! * Width/height resolution sees the *declared* x/y, never the resolved ones.
//! * A width/height that clamps to zero falls back to the full parent size.

mod constrained;
mod dim;
mod offset;

pub use constrained::ConstrainedDimensions;
pub use dim::{Dim, Dimensions, Measure, Rect, Region};
pub use offset::OffsetDimensions;

/// Read access to the four (possibly absent) fields of a rectangle.
pub trait Extents {
    fn x(&self) -> Option<Measure>;
    fn y(&self) -> Option<Measure>;
    fn width(&self) -> Option<Measure>;
    fn height(&self) -> Option<Measure>;
}
