use crate::Extents;
use std::ops::Add;

/// A single declared dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dim {
    /// Absolute terminal cells.
    Cells(i32),
    /// Fraction of the parent extent, nominally within `0.0..=1.0`.
    Fraction(f64),
}

impl Dim {
    /// The declared number as-is, without scaling fractions. Used where the
    /// raw declaration reduces available space.
    pub fn raw(self) -> f64 {
        match self {
            Dim::Cells(n) => f64::from(n),
            Dim::Fraction(f) => f,
        }
    }
}

impl From<i32> for Dim {
    fn from(n: i32) -> Self {
        Dim::Cells(n)
    }
}

impl From<u16> for Dim {
    fn from(n: u16) -> Self {
        Dim::Cells(i32::from(n))
    }
}

impl From<f64> for Dim {
    fn from(f: f64) -> Self {
        Dim::Fraction(f)
    }
}

/// Desired geometry before resolution. Absent x/y center, absent
/// width/height take the full parent extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub x: Option<Dim>,
    pub y: Option<Dim>,
    pub width: Option<Dim>,
    pub height: Option<Dim>,
}

impl Dimensions {
    pub fn new(x: Option<Dim>, y: Option<Dim>, width: Option<Dim>, height: Option<Dim>) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// All four fields as absolute cells.
    pub fn cells(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(
            Some(Dim::Cells(x)),
            Some(Dim::Cells(y)),
            Some(Dim::Cells(width)),
            Some(Dim::Cells(height)),
        )
    }

    /// All four fields as fractions of the parent.
    pub fn fractions(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Some(Dim::Fraction(x)),
            Some(Dim::Fraction(y)),
            Some(Dim::Fraction(width)),
            Some(Dim::Fraction(height)),
        )
    }
}

/// A resolved scalar.
///
/// Resolution normally yields whole cells. When a width/height upper bound is
/// reduced by a fractional declared x/y (e.g. `x = 1.5`), the bound itself is
/// non-integral and the clamped result can be too; that value is kept as
/// `Partial` rather than rounded. Drawing code converts with `cells()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Whole(i32),
    Partial(f64),
}

impl Measure {
    pub fn from_f64(v: f64) -> Self {
        if v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
            Measure::Whole(v as i32)
        } else {
            Measure::Partial(v)
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Measure::Whole(n) => f64::from(n),
            Measure::Partial(v) => v,
        }
    }

    /// Whole cells, flooring a partial value.
    pub fn cells(self) -> i32 {
        match self {
            Measure::Whole(n) => n,
            Measure::Partial(v) => v.floor() as i32,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }
}

impl From<i32> for Measure {
    fn from(n: i32) -> Self {
        Measure::Whole(n)
    }
}

impl PartialEq<i32> for Measure {
    fn eq(&self, other: &i32) -> bool {
        self.as_f64() == f64::from(*other)
    }
}

impl PartialEq<f64> for Measure {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl Add<i32> for Measure {
    type Output = Measure;

    fn add(self, rhs: i32) -> Measure {
        match self {
            Measure::Whole(n) => Measure::Whole(n + rhs),
            Measure::Partial(v) => Measure::from_f64(v + f64::from(rhs)),
        }
    }
}

/// A concrete rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-screen bounds for a terminal of the given size.
    pub fn screen(columns: u16, rows: u16) -> Self {
        Self::new(0, 0, i32::from(columns), i32::from(rows))
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

impl Extents for Rect {
    fn x(&self) -> Option<Measure> {
        Some(Measure::Whole(self.x))
    }
    fn y(&self) -> Option<Measure> {
        Some(Measure::Whole(self.y))
    }
    fn width(&self) -> Option<Measure> {
        Some(Measure::Whole(self.width))
    }
    fn height(&self) -> Option<Measure> {
        Some(Measure::Whole(self.height))
    }
}

/// A rectangle whose fields may be absent; the output of offset projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Region {
    pub x: Option<Measure>,
    pub y: Option<Measure>,
    pub width: Option<Measure>,
    pub height: Option<Measure>,
}

impl Region {
    /// Concrete cells when every field is present.
    pub fn to_rect(&self) -> Option<Rect> {
        Some(Rect::new(
            self.x?.cells(),
            self.y?.cells(),
            self.width?.cells(),
            self.height?.cells(),
        ))
    }
}

impl Extents for Region {
    fn x(&self) -> Option<Measure> {
        self.x
    }
    fn y(&self) -> Option<Measure> {
        self.y
    }
    fn width(&self) -> Option<Measure> {
        self.width
    }
    fn height(&self) -> Option<Measure> {
        self.height
    }
}
