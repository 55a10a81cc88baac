//! The board cell grid.
//!
//! Starts as open water everywhere. Walls arrive through update records and
//! are never cleared for the rest of the game.

use serde::{Deserialize, Serialize};

use super::location::Location;

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Water,
    Wall,
}

/// Row-major cell storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an all-water grid. Non-positive dimensions give an empty grid.
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Grid {
            rows,
            cols,
            cells: vec![Cell::Water; (rows as usize) * (cols as usize)],
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    fn index(&self, loc: Location) -> Option<usize> {
        if loc.row < 0 || loc.col < 0 || loc.row >= self.rows || loc.col >= self.cols {
            return None;
        }
        Some((loc.row * self.cols + loc.col) as usize)
    }

    /// Returns the cell at `loc`, or `None` off the board.
    pub fn cell(&self, loc: Location) -> Option<Cell> {
        self.index(loc).map(|i| self.cells[i])
    }

    /// Marks `loc` as a wall. Returns false if `loc` is off the board.
    pub fn mark_wall(&mut self, loc: Location) -> bool {
        match self.index(loc) {
            Some(i) => {
                self.cells[i] = Cell::Wall;
                true
            }
            None => false,
        }
    }

    /// True for on-board water cells.
    pub fn is_passable(&self, loc: Location) -> bool {
        self.cell(loc) == Some(Cell::Water)
    }

    /// Number of wall cells seen so far.
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Wall).count()
    }
}
