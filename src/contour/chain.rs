use crate::types::Point;
use serde::Serialize;

/// Freeman 8-direction step in image coordinates (`y` down), plus a
/// "no movement" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ChainCode {
    East = 0,
    NorthEast = 1,
    North = 2,
    NorthWest = 3,
    West = 4,
    SouthWest = 5,
    South = 6,
    SouthEast = 7,
    Datum = 8,
}

impl ChainCode {
    /// The eight proper directions, indexed by code value.
    pub const DIRECTIONS: [ChainCode; 8] = [
        ChainCode::East,
        ChainCode::NorthEast,
        ChainCode::North,
        ChainCode::NorthWest,
        ChainCode::West,
        ChainCode::SouthWest,
        ChainCode::South,
        ChainCode::SouthEast,
    ];

    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0..=7 => Some(Self::DIRECTIONS[v as usize]),
            8 => Some(ChainCode::Datum),
            _ => None,
        }
    }

    /// Code for a step of `(dx, dy)`; only the signs are considered.
    pub fn from_step(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (1, 0) => ChainCode::East,
            (1, -1) => ChainCode::NorthEast,
            (0, -1) => ChainCode::North,
            (-1, -1) => ChainCode::NorthWest,
            (-1, 0) => ChainCode::West,
            (-1, 1) => ChainCode::SouthWest,
            (0, 1) => ChainCode::South,
            (1, 1) => ChainCode::SouthEast,
            _ => ChainCode::Datum,
        }
    }

    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        Self::from_step(to.x - from.x, to.y - from.y)
    }

    /// `(dx, dy)` of one step.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            ChainCode::East => (1, 0),
            ChainCode::NorthEast => (1, -1),
            ChainCode::North => (0, -1),
            ChainCode::NorthWest => (-1, -1),
            ChainCode::West => (-1, 0),
            ChainCode::SouthWest => (-1, 1),
            ChainCode::South => (0, 1),
            ChainCode::SouthEast => (1, 1),
            ChainCode::Datum => (0, 0),
        }
    }

    #[inline]
    pub fn apply(self, p: Point) -> Point {
        let (dx, dy) = self.offset();
        p.offset(dx, dy)
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.value() % 2 == 1
    }

    /// Step length: 1 for axis moves and the sentinel, √2 for diagonals.
    #[inline]
    pub fn length(self) -> f64 {
        if self.is_diagonal() {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_codes_agree() {
        for code in ChainCode::DIRECTIONS {
            let (dx, dy) = code.offset();
            assert_eq!(ChainCode::from_step(dx, dy), code);
            assert_eq!(ChainCode::from_value(code.value()), Some(code));
        }
        assert_eq!(ChainCode::from_step(0, 0), ChainCode::Datum);
        assert_eq!(ChainCode::North.apply(Point::new(3, 3)), Point::new(3, 2));
        assert!(ChainCode::SouthWest.is_diagonal());
        assert!(!ChainCode::Datum.is_diagonal());
        assert_eq!(ChainCode::from_value(9), None);
    }
}
