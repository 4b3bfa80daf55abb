use core::fmt;
use core::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer cell coordinate. Arithmetic is exact; there is no wraparound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn squared_length(self) -> i64 {
        self.x * self.x + self.y * self.y
    }

    /// Max of the per-axis distances.
    pub fn chebyshev(self, other: Position) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Split into `(patch position, offset within patch)` for patches of side `n`.
    ///
    /// Uses floor division so negative coordinates land in the patch to their
    /// lower-left.
    pub fn to_patch(self, n: u32) -> (Position, Position) {
        let n = i64::from(n);
        (
            Position::new(self.x.div_euclid(n), self.y.div_euclid(n)),
            Position::new(self.x.rem_euclid(n), self.y.rem_euclid(n)),
        )
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i64> for Position {
    type Output = Position;

    fn mul(self, rhs: i64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
