//! Board geometry: distances, direction paths, ranges and sail options.
//!
//! Everything here is a pure function of the board dimensions and the wrap
//! mode. On a cyclic board each axis is a ring and the shortest way round is
//! always taken; on a bounded board offsets are plain differences.

use serde::{Deserialize, Serialize};

use super::location::{Direction, Location};
use crate::error::GameError;

/// Board dimensions plus wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub rows: i32,
    pub cols: i32,
    pub cyclic: bool,
}

/// Shortest signed walk along one axis: how many steps and which way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisWalk {
    steps: i32,
    forward: bool,
}

impl Geometry {
    pub const fn new(rows: i32, cols: i32, cyclic: bool) -> Self {
        Self { rows, cols, cyclic }
    }

    /// Walk from `from` to `to` along an axis of length `len`.
    ///
    /// Ties on a ring (exactly half way round) go forward.
    fn walk(&self, from: i32, to: i32, len: i32) -> AxisWalk {
        if self.cyclic && len > 0 {
            let forward = (to - from).rem_euclid(len);
            let backward = (len - forward) % len;
            if forward <= backward {
                AxisWalk { steps: forward, forward: true }
            } else {
                AxisWalk { steps: backward, forward: false }
            }
        } else {
            let diff = to - from;
            AxisWalk {
                steps: diff.abs(),
                forward: diff > 0,
            }
        }
    }

    /// Manhattan distance, wrapped per axis on a cyclic board.
    pub fn distance(&self, a: Location, b: Location) -> i32 {
        self.walk(a.row, b.row, self.rows).steps + self.walk(a.col, b.col, self.cols).steps
    }

    /// Unit steps leading from `a` to `b`.
    ///
    /// All row steps come first, then all column steps, and the step count
    /// always equals `distance(a, b)`. When the two points coincide the path
    /// is a single `Direction::Nothing`.
    pub fn directions(&self, a: Location, b: Location) -> Vec<Direction> {
        let rows = self.walk(a.row, b.row, self.rows);
        let cols = self.walk(a.col, b.col, self.cols);
        if rows.steps == 0 && cols.steps == 0 {
            return vec![Direction::Nothing];
        }

        let row_dir = if rows.forward { Direction::South } else { Direction::North };
        let col_dir = if cols.forward { Direction::East } else { Direction::West };

        let mut path = Vec::with_capacity((rows.steps + cols.steps) as usize);
        path.extend(std::iter::repeat(row_dir).take(rows.steps as usize));
        path.extend(std::iter::repeat(col_dir).take(cols.steps as usize));
        path
    }

    /// Reduces a location onto the board. A no-op on bounded boards.
    pub fn wrap(&self, loc: Location) -> Location {
        if !self.cyclic {
            return loc;
        }
        let row = if self.rows > 0 { loc.row.rem_euclid(self.rows) } else { loc.row };
        let col = if self.cols > 0 { loc.col.rem_euclid(self.cols) } else { loc.col };
        Location::new(row, col)
    }

    /// True if `loc` lies inside the board rectangle.
    pub fn contains(&self, loc: Location) -> bool {
        loc.row >= 0 && loc.col >= 0 && loc.row < self.rows && loc.col < self.cols
    }

    /// Applies `steps` to `loc`, wrapping after every step on a cyclic board.
    pub fn destination(&self, loc: Location, steps: &[Direction]) -> Location {
        steps
            .iter()
            .fold(loc, |acc, &d| self.wrap(acc.offset(d)))
    }

    /// Squared Euclidean distance using the shortest per-axis offsets.
    pub fn distance_squared(&self, a: Location, b: Location) -> i64 {
        let dr = self.walk(a.row, b.row, self.rows).steps as i64;
        let dc = self.walk(a.col, b.col, self.cols).steps as i64;
        dr * dr + dc * dc
    }

    /// True iff `0 < d² <= radius2`, with `d²` taken over the raw
    /// coordinate differences. Range never reaches across the seam of a
    /// cyclic board. A point is never in range of itself.
    pub fn in_range(&self, a: Location, b: Location, radius2: i32) -> bool {
        let dr = a.row as i64 - b.row as i64;
        let dc = a.col as i64 - b.col as i64;
        let d2 = dr * dr + dc * dc;
        d2 > 0 && d2 <= radius2 as i64
    }

    /// Destinations reachable in `moves` steps that keep heading for
    /// `target`.
    ///
    /// The candidates are the contiguous `moves`-wide slices of the direction
    /// path around the point where it turns from rows to columns, so the
    /// options fan out between "rows first" and "columns first". Returned
    /// without duplicates, in path order.
    pub fn sail_options(
        &self,
        from: Location,
        target: Location,
        moves: i32,
    ) -> Result<Vec<Location>, GameError> {
        if moves < 0 {
            return Err(GameError::NegativeMoves(moves));
        }
        if from == target || moves == 0 {
            return Ok(vec![from]);
        }

        let path = self.directions(from, target);
        let len = path.len();
        let moves = moves as usize;

        let turn = match path.iter().position(|d| !d.is_vertical()) {
            Some(i) if i > 0 => i,
            _ => len,
        };
        let start = turn.saturating_sub(moves);
        let end = (turn + moves).min(len);
        let window = &path[start..end];

        let mut options = Vec::new();
        if window.len() >= moves {
            for slice in window.windows(moves) {
                let dest = self.destination(from, slice);
                if !options.contains(&dest) {
                    options.push(dest);
                }
            }
        } else {
            options.push(self.destination(from, window));
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Geometry {
        Geometry::new(10, 10, true)
    }

    fn bounded() -> Geometry {
        Geometry::new(10, 10, false)
    }

    #[test]
    fn wrapped_distance_takes_short_way() {
        let g = torus();
        assert_eq!(g.distance(Location::new(0, 0), Location::new(0, 9)), 1);
        assert_eq!(g.distance(Location::new(0, 0), Location::new(9, 9)), 2);
        assert_eq!(g.distance(Location::new(0, 0), Location::new(5, 5)), 10);
    }

    #[test]
    fn bounded_distance_is_manhattan() {
        let g = bounded();
        assert_eq!(g.distance(Location::new(0, 0), Location::new(0, 9)), 9);
        assert_eq!(g.distance(Location::new(2, 3), Location::new(7, 1)), 7);
    }

    #[test]
    fn single_west_step_across_the_seam() {
        let g = torus();
        let path = g.directions(Location::new(0, 0), Location::new(0, 9));
        assert_eq!(path, vec![Direction::West]);
    }

    #[test]
    fn bounded_path_never_wraps() {
        let g = bounded();
        let path = g.directions(Location::new(0, 0), Location::new(0, 9));
        assert_eq!(path, vec![Direction::East; 9]);
    }

    #[test]
    fn rows_resolved_before_columns() {
        let g = torus();
        let path = g.directions(Location::new(1, 1), Location::new(3, 0));
        assert_eq!(
            path,
            vec![Direction::South, Direction::South, Direction::West]
        );
    }

    #[test]
    fn same_point_is_single_noop() {
        let g = torus();
        let p = Location::new(4, 4);
        assert_eq!(g.directions(p, p), vec![Direction::Nothing]);
    }

    #[test]
    fn path_agrees_with_distance_everywhere() {
        for g in [Geometry::new(7, 6, true), Geometry::new(7, 6, false)] {
            for r1 in 0..g.rows {
                for c1 in 0..g.cols {
                    for r2 in 0..g.rows {
                        for c2 in 0..g.cols {
                            let a = Location::new(r1, c1);
                            let b = Location::new(r2, c2);
                            if a == b {
                                continue;
                            }
                            let path = g.directions(a, b);
                            assert_eq!(path.len() as i32, g.distance(a, b), "{a} -> {b}");
                            assert_eq!(g.destination(a, &path), b, "{a} -> {b}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn distance_is_symmetric_and_bounded_per_axis() {
        let g = Geometry::new(9, 8, true);
        for r1 in 0..g.rows {
            for c1 in 0..g.cols {
                let a = Location::new(r1, c1);
                for r2 in 0..g.rows {
                    for c2 in 0..g.cols {
                        let b = Location::new(r2, c2);
                        let d = g.distance(a, b);
                        assert_eq!(d, g.distance(b, a));
                        assert_eq!(d == 0, a == b);
                        let row_part = g.distance(a, Location::new(r2, c1));
                        let col_part = g.distance(a, Location::new(r1, c2));
                        assert!(row_part <= g.rows / 2, "{a} -> {b}");
                        assert!(col_part <= g.cols / 2, "{a} -> {b}");
                        assert_eq!(d, row_part + col_part, "{a} -> {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn destination_wraps_each_step() {
        let g = torus();
        let dest = g.destination(Location::new(0, 0), &[Direction::North, Direction::West]);
        assert_eq!(dest, Location::new(9, 9));
    }

    #[test]
    fn bounded_destination_can_leave_the_board() {
        let g = bounded();
        let dest = g.destination(Location::new(0, 0), &[Direction::North]);
        assert_eq!(dest, Location::new(-1, 0));
        assert!(!g.contains(dest));
    }

    #[test]
    fn in_range_boundaries() {
        let g = Geometry::new(20, 20, false);
        let a = Location::new(5, 5);
        assert!(!g.in_range(a, a, 100));
        // d² = 9 + 16 = 25
        let b = Location::new(8, 9);
        assert!(g.in_range(a, b, 25));
        assert!(!g.in_range(a, b, 24));
    }

    #[test]
    fn in_range_ignores_the_seam_on_torus() {
        let g = torus();
        let a = Location::new(0, 0);
        let b = Location::new(0, 9);
        assert_eq!(g.distance_squared(a, b), 1);
        assert!(!g.in_range(a, b, 1));
        assert!(!g.in_range(a, Location::new(9, 0), 80));
        assert!(g.in_range(a, b, 81));
    }

    #[test]
    fn sail_options_fan_around_the_turn() {
        let g = Geometry::new(20, 20, false);
        let from = Location::new(0, 0);
        let options = g.sail_options(from, Location::new(3, 3), 2).unwrap();
        assert_eq!(
            options,
            vec![Location::new(2, 0), Location::new(1, 1), Location::new(0, 2)]
        );
    }

    #[test]
    fn sail_options_short_window_goes_all_the_way() {
        let g = Geometry::new(20, 20, false);
        let from = Location::new(0, 0);
        let options = g.sail_options(from, Location::new(1, 0), 3).unwrap();
        assert_eq!(options, vec![Location::new(1, 0)]);
    }

    #[test]
    fn sail_options_straight_line_steps_forward() {
        let g = Geometry::new(20, 20, false);
        let from = Location::new(0, 0);
        let options = g.sail_options(from, Location::new(0, 5), 2).unwrap();
        assert_eq!(options, vec![Location::new(0, 2)]);
    }

    #[test]
    fn sail_options_at_target_stays() {
        let g = torus();
        let here = Location::new(3, 3);
        assert_eq!(g.sail_options(here, here, 4).unwrap(), vec![here]);
    }

    #[test]
    fn sail_options_zero_moves_stays() {
        let g = torus();
        let here = Location::new(3, 3);
        assert_eq!(
            g.sail_options(here, Location::new(5, 5), 0).unwrap(),
            vec![here]
        );
    }

    #[test]
    fn sail_options_rejects_negative_moves() {
        let g = torus();
        let err = g
            .sail_options(Location::new(0, 0), Location::new(1, 1), -1)
            .unwrap_err();
        assert_eq!(err, GameError::NegativeMoves(-1));
    }
}
