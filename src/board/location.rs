//! Board coordinates and unit-step directions.
//!
//! A `Location` is a plain (row, col) pair. Directions map to a wire
//! character and a unit offset through explicit lookup functions rather
//! than through any numeric enum representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the board, addressed by row then column.
///
/// Coordinates are signed: on a bounded board `destination` may run off the
/// edge and callers are expected to validate with `is_passable`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns this location shifted by one step in `direction`, without
    /// any wrapping.
    pub fn offset(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single sailing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    /// Stay put. Only produced when source and destination coincide.
    Nothing,
}

impl Direction {
    /// The four real sailing directions.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the single-character wire code.
    pub const fn wire_char(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::South => 's',
            Direction::East => 'e',
            Direction::West => 'w',
            Direction::Nothing => '-',
        }
    }

    /// Returns the (row, col) unit offset.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::Nothing => (0, 0),
        }
    }

    /// True for North and South.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// Anything that occupies a board cell.
///
/// Lets geometry queries take a location, a pirate or a treasure
/// interchangeably.
pub trait Positioned {
    fn location(&self) -> Location;
}

impl Positioned for Location {
    fn location(&self) -> Location {
        *self
    }
}

impl<T: Positioned + ?Sized> Positioned for &T {
    fn location(&self) -> Location {
        (**self).location()
    }
}
