use crate::Position;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the four compass directions.
///
/// `Up` is +y and `Right` is +x. When used relative to an agent, `Up` means
/// "the way the agent is facing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Stable index in `0..4`, usable as a table key.
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in this direction.
    pub fn offset(self) -> Position {
        match self {
            Direction::Up => Position::new(0, 1),
            Direction::Down => Position::new(0, -1),
            Direction::Left => Position::new(-1, 0),
            Direction::Right => Position::new(1, 0),
        }
    }

    /// Compose a facing with a direction expressed relative to it.
    ///
    /// `facing.relative(Up) == facing`, `facing.relative(Left) == facing.turn_left()`.
    pub fn relative(self, relative: Direction) -> Direction {
        match relative {
            Direction::Up => self,
            Direction::Down => self.reverse(),
            Direction::Left => self.turn_left(),
            Direction::Right => self.turn_right(),
        }
    }

    /// Map an egocentric offset (where +y is "ahead") into world axes for an
    /// agent facing `self`.
    pub fn rotate(self, offset: Position) -> Position {
        match self {
            Direction::Up => offset,
            Direction::Right => Position::new(offset.y, -offset.x),
            Direction::Down => Position::new(-offset.x, -offset.y),
            Direction::Left => Position::new(-offset.y, offset.x),
        }
    }
}
