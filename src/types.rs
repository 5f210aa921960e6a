use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer pixel coordinate. `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned box with inclusive pixel bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering a full `width × height` raster.
    pub fn of_raster(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i32 - 1, height as i32 - 1)
    }

    /// Smallest box enclosing every point, `None` for an empty iterator.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bounds.left = bounds.left.min(p.x);
            bounds.right = bounds.right.max(p.x);
            bounds.top = bounds.top.min(p.y);
            bounds.bottom = bounds.bottom.max(p.y);
        }
        Some(bounds)
    }

    /// Number of pixel columns covered.
    #[inline]
    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Number of pixel rows covered.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width().max(0) as i64 * self.height().max(0) as i64
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// True when `other` lies entirely inside `self` (edges may touch).
    #[inline]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Intersection with `other`, `None` when disjoint.
    pub fn clip(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let clipped = BoundingBox::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        (clipped.left <= clipped.right && clipped.top <= clipped.bottom).then_some(clipped)
    }

    /// Centre of the box, rounded towards the top-left.
    pub fn center(&self) -> Point {
        Point::new(
            self.left + (self.right - self.left) / 2,
            self.top + (self.bottom - self.top) / 2,
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]..[{}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}
