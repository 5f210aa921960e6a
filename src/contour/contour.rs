use crate::contour::chain::ChainCode;
use crate::contour::fill::{point_in_polygon, scanline_fill};
use crate::types::{BoundingBox, Point};
use serde::Serialize;
use std::collections::HashSet;

/// Empirical correction applied to chain-code perimeters.
pub const PERIMETER_FACTOR: f64 = 0.95;

/// Direction in which a tracer walked the boundary, as seen on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MarchDirection {
    Clockwise,
    CounterClockwise,
}

/// Closed boundary stored as a start point and Freeman chain codes.
///
/// `codes[i]` for `i >= 1` is the step that reaches boundary point `i`;
/// `codes[0]` is the closing step from the last point back to the start.
/// Boundary points and the bounding box are derived once on construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    start: Point,
    codes: Vec<ChainCode>,
    direction: MarchDirection,
    points: Vec<Point>,
    bounds: BoundingBox,
}

impl Contour {
    /// Build a contour. An empty code list becomes a single sentinel code so
    /// the contour always describes at least its start point.
    pub fn new(start: Point, mut codes: Vec<ChainCode>, direction: MarchDirection) -> Self {
        if codes.is_empty() {
            codes.push(ChainCode::Datum);
        }
        let mut points = Vec::with_capacity(codes.len());
        let mut p = start;
        points.push(p);
        for &code in &codes[1..] {
            p = code.apply(p);
            points.push(p);
        }
        let bounds = BoundingBox::enclosing(points.iter().copied())
            .unwrap_or_else(|| BoundingBox::new(start.x, start.y, start.x, start.y));
        Self {
            start,
            codes,
            direction,
            points,
            bounds,
        }
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn codes(&self) -> &[ChainCode] {
        &self.codes
    }

    /// Number of chain codes (equals the number of boundary points).
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline]
    pub fn direction(&self) -> MarchDirection {
        self.direction
    }

    /// Ordered boundary points, starting with the start point.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// True when replaying every code, the closing one last, lands back on
    /// the start point.
    pub fn is_closed(&self) -> bool {
        let last = self.points.last().copied().unwrap_or(self.start);
        self.codes[0].apply(last) == self.start
    }

    /// Chain-code length, diagonals weighted √2, scaled by
    /// [`PERIMETER_FACTOR`].
    pub fn perimeter(&self) -> f64 {
        self.codes.iter().map(|c| c.length()).sum::<f64>() * PERIMETER_FACTOR
    }

    /// Pixels strictly inside the boundary polygon that are not themselves
    /// boundary pixels.
    pub fn interior_points(&self) -> Vec<Point> {
        let boundary: HashSet<Point> = self.points.iter().copied().collect();
        scanline_fill(&self.points, self.bounds)
            .into_iter()
            .filter(|p| !boundary.contains(p))
            .collect()
    }

    /// Boundary plus interior pixels.
    pub fn filled_points(&self) -> HashSet<Point> {
        let mut set: HashSet<Point> = self.points.iter().copied().collect();
        set.extend(scanline_fill(&self.points, self.bounds));
        set
    }

    /// Number of filled pixels.
    pub fn area(&self) -> usize {
        self.filled_points().len()
    }

    /// Pick's theorem estimate `I + B/2 - 1` with `B` the code count.
    pub fn area_pick(&self) -> f64 {
        self.interior_points().len() as f64 + self.codes.len() as f64 / 2.0 - 1.0
    }

    /// Polygon area of the pixel-centre boundary integrated along the chain
    /// codes. Positive when the contour was walked in its declared direction.
    pub fn chain_area(&self) -> f64 {
        // `up` grows towards the top of the image.
        let mut up = 0.0f64;
        let mut area = 0.0f64;
        let sign = match self.direction {
            MarchDirection::CounterClockwise => 1.0,
            MarchDirection::Clockwise => -1.0,
        };
        for &code in &self.codes {
            match code {
                ChainCode::East => area -= up,
                ChainCode::NorthEast => {
                    area -= up + 0.5;
                    up += 1.0;
                }
                ChainCode::North => up += 1.0,
                ChainCode::NorthWest => {
                    area += up + 0.5;
                    up += 1.0;
                }
                ChainCode::West => area += up,
                ChainCode::SouthWest => {
                    area += up - 0.5;
                    up -= 1.0;
                }
                ChainCode::South => up -= 1.0,
                ChainCode::SouthEast => {
                    area -= up - 0.5;
                    up -= 1.0;
                }
                ChainCode::Datum => {}
            }
        }
        sign * area
    }

    /// Boundary points where the outgoing code differs from the incoming one.
    pub fn vertices(&self) -> Vec<Point> {
        let n = self.codes.len();
        (0..n)
            .filter(|&i| self.codes[i] != self.codes[(i + 1) % n])
            .map(|i| self.points[i])
            .collect()
    }

    /// True for boundary pixels and pixels the even-odd rule puts inside.
    pub fn contains_point(&self, p: Point) -> bool {
        self.bounds.contains_point(p)
            && (self.points.contains(&p) || point_in_polygon(&self.points, p))
    }

    /// Bounding-box containment of `inner` in `outer`.
    pub fn is_contained(outer: &Contour, inner: &Contour) -> bool {
        outer.bounds.contains(&inner.bounds)
    }

    /// Same shape moved by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Contour {
        Contour::new(self.start.offset(dx, dy), self.codes.clone(), self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ChainCode::*;

    /// 3×3 ring starting at its top-left pixel, walked down the left side.
    fn ring3() -> Contour {
        Contour::new(
            Point::new(0, 0),
            vec![West, South, South, East, East, North, North, West],
            MarchDirection::CounterClockwise,
        )
    }

    #[test]
    fn replay_reconstructs_ring() {
        let c = ring3();
        assert_eq!(c.points().len(), 8);
        assert_eq!(c.points()[3], Point::new(1, 2));
        assert!(c.is_closed());
        assert_eq!(c.bounds(), BoundingBox::new(0, 0, 2, 2));
        assert_eq!(c.area(), 9);
        assert_eq!(c.interior_points(), vec![Point::new(1, 1)]);
        assert!((c.area_pick() - 4.0).abs() < 1e-9);
        assert!((c.chain_area() - 4.0).abs() < 1e-9);
        assert!((c.perimeter() - 8.0 * 0.95).abs() < 1e-9);
        assert_eq!(c.vertices().len(), 4);
    }

    #[test]
    fn open_code_list_is_not_closed() {
        let c = Contour::new(
            Point::new(5, 5),
            vec![East, East, East],
            MarchDirection::CounterClockwise,
        );
        assert!(!c.is_closed());
        let empty = Contour::new(Point::new(1, 1), Vec::new(), MarchDirection::Clockwise);
        assert_eq!(empty.len(), 1);
        assert!(empty.is_closed());
    }

    #[test]
    fn containment_uses_bounds() {
        let outer = ring3().translated(10, 10);
        let big = Contour::new(
            Point::new(8, 8),
            vec![West, South, South, South, South, South, South, East, East, East, East, East, East,
                North, North, North, North, North, North, West, West, West, West, West],
            MarchDirection::CounterClockwise,
        );
        assert!(big.is_closed());
        assert!(Contour::is_contained(&big, &outer));
        assert!(!Contour::is_contained(&outer, &big));
        assert!(big.contains_point(Point::new(11, 11)));
        assert!(!big.contains_point(Point::new(20, 11)));
    }
}
