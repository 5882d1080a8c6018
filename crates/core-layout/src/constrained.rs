use crate::{Dim, Dimensions, Extents, Measure, Rect};

/// Declared geometry bound to a concrete parent.
///
/// Accessors resolve lazily in dependency order: `width`/`height` stand alone,
/// `x`/`y` need the resolved `width`/`height` when they have to center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstrainedDimensions {
    pub base: Dimensions,
    pub constraints: Rect,
}

/// Clamp `val` into `[minval, maxval]`. Fractions are first scaled to
/// `minval + f * (maxval - minval)` and rounded half-to-even. When
/// `maxval < minval` the result is `minval`.
fn clamp(val: Dim, minval: f64, maxval: f64) -> Measure {
    let v = match val {
        Dim::Cells(n) => f64::from(n),
        Dim::Fraction(f) => (minval + f * (maxval - minval)).round_ties_even(),
    };
    Measure::from_f64(maxval.min(v).max(minval))
}

/// `origin + (extent - size) / 2` with floor division.
fn center(origin: i32, extent: i32, size: Measure) -> i32 {
    origin + ((f64::from(extent) - size.as_f64()) / 2.0).floor() as i32
}

impl ConstrainedDimensions {
    pub fn new(base: Dimensions, constraints: Rect) -> Self {
        Self { base, constraints }
    }

    pub fn x(&self) -> i32 {
        let c = &self.constraints;
        match self.base.x {
            None => center(c.x, c.width, self.width()),
            Some(d) => clamp(d, f64::from(c.x), f64::from(c.right())).cells(),
        }
    }

    pub fn y(&self) -> i32 {
        let c = &self.constraints;
        match self.base.y {
            None => center(c.y, c.height, self.height()),
            Some(d) => clamp(d, f64::from(c.y), f64::from(c.bottom())).cells(),
        }
    }

    pub fn width(&self) -> Measure {
        Self::extent(self.base.width, self.base.x, self.constraints.width, "width")
    }

    pub fn height(&self) -> Measure {
        Self::extent(self.base.height, self.base.y, self.constraints.height, "height")
    }

    /// Shared width/height rule: available space is the parent extent minus
    /// the *declared* origin; zero falls back to the full parent extent.
    fn extent(size: Option<Dim>, origin: Option<Dim>, parent: i32, axis: &'static str) -> Measure {
        let Some(size) = size else {
            return Measure::Whole(parent);
        };
        let available = f64::from(parent) - origin.map(Dim::raw).unwrap_or(0.0);
        let clamped = clamp(size, 0.0, available);
        if clamped.is_zero() {
            tracing::trace!(target: "layout", axis, parent, "zero_extent_fallback");
            Measure::Whole(parent)
        } else {
            clamped
        }
    }

    /// Resolve all four fields to whole cells.
    pub fn resolve(&self) -> Rect {
        let width = self.width();
        let height = self.height();
        Rect::new(self.x(), self.y(), width.cells(), height.cells())
    }
}

impl Extents for ConstrainedDimensions {
    fn x(&self) -> Option<Measure> {
        Some(Measure::Whole(ConstrainedDimensions::x(self)))
    }
    fn y(&self) -> Option<Measure> {
        Some(Measure::Whole(ConstrainedDimensions::y(self)))
    }
    fn width(&self) -> Option<Measure> {
        Some(ConstrainedDimensions::width(self))
    }
    fn height(&self) -> Option<Measure> {
        Some(ConstrainedDimensions::height(self))
    }
}
