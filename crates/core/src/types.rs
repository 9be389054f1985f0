use serde::{Deserialize, Serialize};

use crate::error::DirectionError;

/// Grid position. `y` is the row (growing downward), `x` the column.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dy: i32, dx: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    pub fn distance_squared(self, other: Pos) -> i64 {
        let dy = i64::from(self.y - other.y);
        let dx = i64::from(self.x - other.x);
        dy * dy + dx * dx
    }

    pub fn distance(self, other: Pos) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

pub const PLAYER_GLYPH: char = '@';
pub const BLANK_GLYPH: char = ' ';

/// One of the eight compass moves, numbered clockwise starting east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
    ];

    /// Unit step as `(dy, dx)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (0, 1),
            Direction::SouthEast => (1, 1),
            Direction::South => (1, 0),
            Direction::SouthWest => (1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (-1, -1),
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn step(self, from: Pos) -> Pos {
        let (dy, dx) = self.delta();
        from.offset(dy, dx)
    }
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::ALL.get(usize::from(code)).copied().ok_or(DirectionError { code })
    }
}
