//! Recognised diagram primitives.
use crate::types::{BoundingBox, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Pointer direction of an arrow, y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowDirection {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl ArrowDirection {
    /// Tail and head of an arrow spanning `bounds`.
    pub fn endpoints(self, bounds: &BoundingBox) -> (Point, Point) {
        let (l, t, r, b) = (bounds.left, bounds.top, bounds.right, bounds.bottom);
        let mid_x = l + bounds.width() / 2;
        let mid_y = t + bounds.height() / 2;
        let (start, end) = match self {
            ArrowDirection::East => ((l, mid_y), (r, mid_y)),
            ArrowDirection::NorthEast => ((l, b), (r, t)),
            ArrowDirection::North => ((mid_x, b), (mid_x, t)),
            ArrowDirection::NorthWest => ((r, b), (l, t)),
            ArrowDirection::West => ((r, mid_y), (l, mid_y)),
            ArrowDirection::SouthWest => ((r, t), (l, b)),
            ArrowDirection::South => ((mid_x, t), (mid_x, b)),
            ArrowDirection::SouthEast => ((l, t), (r, b)),
        };
        (Point::new(start.0, start.1), Point::new(end.0, end.1))
    }
}

/// Tag of a recognition, including the manual `Noise` verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Noise,
    Rectangle,
    Ellipse,
    Bar,
    Arrow(ArrowDirection),
    Character(char),
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Noise => write!(f, "noise"),
            ObjectType::Rectangle => write!(f, "rectangle"),
            ObjectType::Ellipse => write!(f, "ellipse"),
            ObjectType::Bar => write!(f, "bar"),
            ObjectType::Arrow(d) => write!(f, "arrow({d:?})"),
            ObjectType::Character(c) => write!(f, "character('{c}')"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometricObject {
    Rectangle {
        bounds: BoundingBox,
    },
    Ellipse {
        bounds: BoundingBox,
    },
    Bar {
        bounds: BoundingBox,
    },
    Arrow {
        direction: ArrowDirection,
        start: Point,
        end: Point,
    },
    Character {
        bounds: BoundingBox,
        glyph: char,
        centroid: Point,
    },
}

impl GeometricObject {
    pub fn arrow(direction: ArrowDirection, bounds: &BoundingBox) -> Self {
        let (start, end) = direction.endpoints(bounds);
        GeometricObject::Arrow {
            direction,
            start,
            end,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            GeometricObject::Rectangle { .. } => ObjectType::Rectangle,
            GeometricObject::Ellipse { .. } => ObjectType::Ellipse,
            GeometricObject::Bar { .. } => ObjectType::Bar,
            GeometricObject::Arrow { direction, .. } => ObjectType::Arrow(*direction),
            GeometricObject::Character { glyph, .. } => ObjectType::Character(*glyph),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        match self {
            GeometricObject::Rectangle { bounds }
            | GeometricObject::Ellipse { bounds }
            | GeometricObject::Bar { bounds }
            | GeometricObject::Character { bounds, .. } => *bounds,
            GeometricObject::Arrow { start, end, .. } => BoundingBox::new(
                start.x.min(end.x),
                start.y.min(end.y),
                start.x.max(end.x),
                start.y.max(end.y),
            ),
        }
    }

    pub fn centroid(&self) -> Point {
        match self {
            GeometricObject::Rectangle { bounds }
            | GeometricObject::Ellipse { bounds }
            | GeometricObject::Bar { bounds } => Point::new(
                bounds.left + bounds.width() / 2,
                bounds.top + bounds.height() / 2,
            ),
            GeometricObject::Arrow { start, end, .. } => {
                Point::new((start.x + end.x) / 2, (start.y + end.y) / 2)
            }
            GeometricObject::Character { centroid, .. } => *centroid,
        }
    }

    /// Area of a box or ellipse; `None` for arrows and glyphs.
    pub fn area(&self) -> Option<f64> {
        match self {
            GeometricObject::Rectangle { bounds } | GeometricObject::Bar { bounds } => {
                Some(bounds.area() as f64)
            }
            GeometricObject::Ellipse { bounds } => {
                Some(PI * bounds.width() as f64 * bounds.height() as f64 / 4.0)
            }
            _ => None,
        }
    }

    /// Box perimeter `2(w + h)`; Ramanujan's approximation for ellipses.
    pub fn perimeter(&self) -> Option<f64> {
        match self {
            GeometricObject::Rectangle { bounds } | GeometricObject::Bar { bounds } => {
                Some(2.0 * (bounds.width() + bounds.height()) as f64)
            }
            GeometricObject::Ellipse { bounds } => {
                let a = bounds.width() as f64 / 2.0;
                let b = bounds.height() as f64 / 2.0;
                if a + b <= 0.0 {
                    return Some(0.0);
                }
                let h = ((a - b) / (a + b)).powi(2);
                Some(PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt())))
            }
            _ => None,
        }
    }

    /// `sqrt(1 - (minor/major)²)` for ellipses.
    pub fn eccentricity(&self) -> Option<f64> {
        let GeometricObject::Ellipse { bounds } = self else {
            return None;
        };
        let w = bounds.width() as f64;
        let h = bounds.height() as f64;
        let (major, minor) = if w >= h { (w, h) } else { (h, w) };
        if major <= 0.0 {
            return Some(0.0);
        }
        Some((1.0 - (minor / major).powi(2)).sqrt())
    }
}

impl fmt::Display for GeometricObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometricObject::Arrow {
                direction,
                start,
                end,
            } => write!(f, "Arrow {direction:?} {start} -> {end}"),
            GeometricObject::Character { glyph, bounds, .. } => {
                write!(f, "Character '{glyph}' {bounds}")
            }
            other => write!(f, "{:?} {}", other.object_type(), other.bounds()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_metrics() {
        let bounds = BoundingBox::new(10, 10, 29, 19);
        let rect = GeometricObject::Rectangle { bounds };
        assert_eq!(rect.area(), Some(200.0));
        assert_eq!(rect.perimeter(), Some(60.0));
        assert_eq!(rect.centroid(), Point::new(20, 15));
        assert_eq!(rect.object_type(), ObjectType::Rectangle);

        let circle = GeometricObject::Ellipse {
            bounds: BoundingBox::new(0, 0, 19, 19),
        };
        let p = circle.perimeter().unwrap();
        assert!((p - PI * 20.0).abs() < 1e-9, "circle perimeter {p}");
        assert_eq!(circle.eccentricity(), Some(0.0));
    }

    #[test]
    fn arrow_endpoints_follow_direction() {
        let bounds = BoundingBox::new(0, 0, 10, 4);
        let east = GeometricObject::arrow(ArrowDirection::East, &bounds);
        assert_eq!(
            east,
            GeometricObject::Arrow {
                direction: ArrowDirection::East,
                start: Point::new(0, 2),
                end: Point::new(10, 2)
            }
        );
        let (s, e) = ArrowDirection::SouthWest.endpoints(&bounds);
        assert_eq!((s, e), (Point::new(10, 0), Point::new(0, 4)));
        let north = GeometricObject::arrow(ArrowDirection::North, &bounds);
        assert_eq!(north.bounds(), BoundingBox::new(5, 0, 5, 4));
        assert_eq!(north.object_type(), ObjectType::Arrow(ArrowDirection::North));
    }
}
