//! The per-turn view of pirates and treasures.
//!
//! Built from a `TurnUpdate` and thrown away at the next one. The
//! visibility grid lives here too: it is derived on first query and dies
//! with the snapshot, so it can never outlive the positions it was built
//! from.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::board::{Geometry, Location, Pirate, Treasure, Vision};

/// Pirates and treasures for one turn.
#[derive(Debug, Clone, Default)]
pub struct TurnSnapshot {
    /// Every pirate in arrival order, lost ones included.
    all: Vec<Pirate>,
    /// Ours, sorted by id.
    mine: Vec<Pirate>,
    /// Everyone else's, sorted by id.
    enemy: Vec<Pirate>,
    treasures: Vec<Treasure>,
    /// Active pirates by cell. A later record for the same cell wins.
    by_location: HashMap<Location, Pirate>,
    vision: OnceCell<Vision>,
}

impl TurnSnapshot {
    pub fn new(pirates: Vec<Pirate>, mut treasures: Vec<Treasure>) -> Self {
        let mut mine: Vec<Pirate> = pirates.iter().copied().filter(|p| p.owner.is_me()).collect();
        let mut enemy: Vec<Pirate> = pirates.iter().copied().filter(|p| !p.owner.is_me()).collect();
        mine.sort_by_key(|p| p.id);
        enemy.sort_by_key(|p| p.id);
        treasures.sort_by_key(|t| t.id);

        let by_location = pirates
            .iter()
            .filter(|p| !p.is_lost)
            .map(|p| (p.location, *p))
            .collect();

        Self {
            all: pirates,
            mine,
            enemy,
            treasures,
            by_location,
            vision: OnceCell::new(),
        }
    }

    pub fn all(&self) -> &[Pirate] {
        &self.all
    }

    pub fn mine(&self) -> &[Pirate] {
        &self.mine
    }

    pub fn enemy(&self) -> &[Pirate] {
        &self.enemy
    }

    pub fn treasures(&self) -> &[Treasure] {
        &self.treasures
    }

    pub fn pirate_on(&self, loc: Location) -> Option<Pirate> {
        self.by_location.get(&loc).copied()
    }

    /// The visibility grid for this turn, computed from our active pirates
    /// on first call.
    pub fn vision(&self, geometry: Geometry, offsets: &[(i32, i32)]) -> &Vision {
        self.vision.get_or_init(|| {
            let sources = self.mine.iter().filter(|p| !p.is_lost).map(|p| p.location);
            Vision::compute(geometry, offsets, sources)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{disc_offsets, Owner};

    fn pirate(id: u32, owner: Owner, row: i32, col: i32) -> Pirate {
        let loc = Location::new(row, col);
        Pirate::new(id, owner, loc, loc)
    }

    #[test]
    fn splits_and_sorts_by_owner() {
        let snapshot = TurnSnapshot::new(
            vec![
                pirate(2, Owner::ME, 0, 0),
                pirate(1, Owner::ENEMY, 1, 1),
                pirate(0, Owner::ME, 2, 2),
                pirate(0, Owner::ENEMY, 3, 3),
            ],
            vec![Treasure::new(5, Location::new(0, 1)), Treasure::new(1, Location::new(0, 2))],
        );
        let mine: Vec<u32> = snapshot.mine().iter().map(|p| p.id).collect();
        let enemy: Vec<u32> = snapshot.enemy().iter().map(|p| p.id).collect();
        let treasures: Vec<u32> = snapshot.treasures().iter().map(|t| t.id).collect();
        assert_eq!(mine, vec![0, 2]);
        assert_eq!(enemy, vec![0, 1]);
        assert_eq!(treasures, vec![1, 5]);
        assert_eq!(snapshot.all().len(), 4);
    }

    #[test]
    fn lost_pirates_occupy_nothing() {
        let mut lost = pirate(0, Owner::ME, 4, 4);
        lost.is_lost = true;
        let snapshot = TurnSnapshot::new(vec![lost], Vec::new());
        assert!(snapshot.pirate_on(Location::new(4, 4)).is_none());
    }

    #[test]
    fn vision_ignores_enemies_and_lost() {
        let mut lost = pirate(1, Owner::ME, 8, 8);
        lost.is_lost = true;
        let snapshot = TurnSnapshot::new(
            vec![pirate(0, Owner::ME, 0, 0), lost, pirate(0, Owner::ENEMY, 5, 5)],
            Vec::new(),
        );
        let vision = snapshot.vision(Geometry::new(10, 10, false), &disc_offsets(0, 10));
        assert_eq!(vision.visible_count(), 1);
        assert!(vision.is_visible(Location::new(0, 0)));
    }
}
