//! Friendly-collision cancellation.
//!
//! Before orders go out, no two of our pirates may finish the turn on the
//! same cell. Collisions are found by grouping pirates on their intended
//! destination; in each group the first pirate keeps its order and every
//! other pirate loses its whole slot. Cancelling a mover turns it into a
//! stationary pirate, which can create new collisions, so the pass repeats
//! until a fixed point or until it has run once per pirate.

use std::collections::BTreeMap;

use log::debug;

use super::book::OrderBook;
use crate::board::{Geometry, Location, Pirate};

/// Pirates whose orders would land them on the same cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub destination: Location,
    /// Starting locations; stationary pirates first, then movers, each in
    /// the order the pirates were given.
    pub origins: Vec<Location>,
}

/// Groups `pirates` by intended destination and returns every group with
/// more than one member.
pub fn find_collisions(geometry: &Geometry, book: &OrderBook, pirates: &[Pirate]) -> Vec<Collision> {
    let mut ranked: Vec<(bool, Location)> = pirates
        .iter()
        .map(|p| {
            let moving = book.get(p.location).is_some_and(|o| o.has_movement());
            (moving, p.location)
        })
        .collect();
    // Stable: ties keep the caller's order.
    ranked.sort_by_key(|(moving, _)| *moving);

    let mut groups: BTreeMap<Location, Vec<Location>> = BTreeMap::new();
    for (_, origin) in ranked {
        let destination = book.destination_of(geometry, origin);
        groups.entry(destination).or_default().push(origin);
    }

    groups
        .into_iter()
        .filter(|(_, origins)| origins.len() > 1)
        .map(|(destination, origins)| Collision { destination, origins })
        .collect()
}

/// Cancels orders until no two `pirates` share a destination.
///
/// `pirates` should be our active pirates sorted by id. Returns how many
/// slots were cancelled across all passes.
pub fn cancel_collisions(geometry: &Geometry, book: &mut OrderBook, pirates: &[Pirate]) -> usize {
    let mut cancelled = 0;
    for pass in 0..pirates.len() {
        let collisions = find_collisions(geometry, book, pirates);
        if collisions.is_empty() {
            break;
        }
        for collision in &collisions {
            debug!(
                "pass {}: {} pirates bound for {}",
                pass,
                collision.origins.len(),
                collision.destination
            );
            for origin in &collision.origins[1..] {
                if book.cancel(*origin).is_some() {
                    cancelled += 1;
                }
            }
        }
    }
    cancelled
}
