//! Fog-of-war visibility.
//!
//! The disc of offsets depends only on the view radius and is computed once
//! per game. The grid itself depends on where our pirates are and is rebuilt
//! for every turn on first use.

use super::geometry::Geometry;
use super::location::Location;

/// Integer offsets `(dr, dc)` with `dr² + dc² <= radius2` and neither
/// component beyond `max_reach`.
///
/// The cap keeps the disc no wider than the board, whatever the server
/// sends as the view radius.
pub fn disc_offsets(radius2: i32, max_reach: i32) -> Vec<(i32, i32)> {
    if radius2 < 0 || max_reach < 0 {
        return Vec::new();
    }
    let radius2 = radius2 as i64;
    let mut reach = (radius2 as f64).sqrt() as i64;
    while (reach + 1) * (reach + 1) <= radius2 {
        reach += 1;
    }
    let reach = reach.min(max_reach as i64) as i32;

    let mut offsets = Vec::new();
    for dr in -reach..=reach {
        for dc in -reach..=reach {
            let d2 = (dr as i64) * (dr as i64) + (dc as i64) * (dc as i64);
            if d2 <= radius2 {
                offsets.push((dr, dc));
            }
        }
    }
    offsets
}

/// A per-turn visibility grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vision {
    geometry: Geometry,
    visible: Vec<bool>,
}

impl Vision {
    /// Marks every cell within `offsets` of any of `sources`.
    pub fn compute<I>(geometry: Geometry, offsets: &[(i32, i32)], sources: I) -> Self
    where
        I: IntoIterator<Item = Location>,
    {
        let rows = geometry.rows.max(0);
        let cols = geometry.cols.max(0);
        let mut visible = vec![false; (rows as usize) * (cols as usize)];
        for source in sources {
            for &(dr, dc) in offsets {
                let cell = geometry.wrap(Location::new(source.row + dr, source.col + dc));
                if geometry.contains(cell) {
                    visible[(cell.row * cols + cell.col) as usize] = true;
                }
            }
        }
        Vision { geometry, visible }
    }

    /// True if `loc` is seen by at least one source. Off-board coordinates
    /// are reduced on a cyclic board and never visible on a bounded one.
    pub fn is_visible(&self, loc: Location) -> bool {
        let loc = self.geometry.wrap(loc);
        if !self.geometry.contains(loc) {
            return false;
        }
        self.visible[(loc.row * self.geometry.cols + loc.col) as usize]
    }

    /// Number of visible cells.
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disc_of_radius_one() {
        let mut offsets = disc_offsets(1, 10);
        offsets.sort();
        assert_eq!(offsets, vec![(-1, 0), (0, -1), (0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn disc_of_radius_two_squared_includes_diagonals() {
        assert_eq!(disc_offsets(2, 10).len(), 9);
        assert_eq!(disc_offsets(4, 10).len(), 13);
    }

    #[test]
    fn huge_radius_is_capped_by_reach() {
        let offsets = disc_offsets(i32::MAX, 2);
        assert_eq!(offsets.len(), 25);
        assert!(offsets.iter().all(|&(dr, dc)| dr.abs() <= 2 && dc.abs() <= 2));
    }

    #[test]
    fn reach_just_past_i32_square_root() {
        // 46341² exceeds i32::MAX.
        let offsets = disc_offsets(46340 * 46340, 0);
        assert_eq!(offsets, vec![(0, 0)]);
    }

    #[test]
    fn negative_radius_sees_nothing() {
        assert!(disc_offsets(-1, 10).is_empty());
    }

    #[test]
    fn vision_wraps_on_torus() {
        let g = Geometry::new(5, 5, true);
        let vision = Vision::compute(g, &disc_offsets(1, 10), [Location::new(0, 0)]);
        assert!(vision.is_visible(Location::new(4, 0)));
        assert!(vision.is_visible(Location::new(0, 4)));
        assert!(!vision.is_visible(Location::new(2, 2)));
        assert_eq!(vision.visible_count(), 5);
    }

    #[test]
    fn vision_clips_on_bounded_board() {
        let g = Geometry::new(5, 5, false);
        let vision = Vision::compute(g, &disc_offsets(1, 10), [Location::new(0, 0)]);
        assert_eq!(vision.visible_count(), 3);
        assert!(!vision.is_visible(Location::new(-1, 0)));
        assert!(!vision.is_visible(Location::new(4, 0)));
    }

    #[test]
    fn no_sources_means_fog_everywhere() {
        let g = Geometry::new(4, 4, true);
        let vision = Vision::compute(g, &disc_offsets(9, 10), std::iter::empty());
        assert_eq!(vision.visible_count(), 0);
    }
}
