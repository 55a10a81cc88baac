//! Moves, orders and the per-location order book.
//!
//! Orders are keyed by the location a pirate stood on when the turn's update
//! arrived. A slot bundles every move queued there, so cancelling a slot
//! throws away attacks and defends along with the sailing steps.

use std::collections::BTreeMap;
use std::fmt;

use crate::board::{Direction, Geometry, Location};

/// One queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// A single sailing step.
    Sail(Direction),
    /// Attack the pirate with this id.
    Attack { target: u32 },
    /// Raise the defensive shield.
    Defend,
}

impl Move {
    /// Sailing direction, if this is a step that actually moves.
    pub fn step(self) -> Option<Direction> {
        match self {
            Move::Sail(Direction::Nothing) => None,
            Move::Sail(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Sail(d) => write!(f, "{}", d.wire_char()),
            Move::Attack { target } => write!(f, "a{}", target),
            Move::Defend => f.write_str("d"),
        }
    }
}

/// Everything queued at one location for the current turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order {
    pub moves: Vec<Move>,
    /// Free-form tokens appended after the move codes on the wire.
    pub arguments: Vec<String>,
}

impl Order {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The sailing steps in queue order, skipping no-op steps.
    pub fn steps(&self) -> Vec<Direction> {
        self.moves.iter().filter_map(|m| m.step()).collect()
    }

    /// True if at least one queued move changes the pirate's cell.
    pub fn has_movement(&self) -> bool {
        self.moves.iter().any(|m| m.step().is_some())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.moves {
            write!(f, "{}", m)?;
        }
        if !self.arguments.is_empty() {
            write!(f, " {}", self.arguments.join(" "))?;
        }
        Ok(())
    }
}

/// Order slots for the current turn, one per location.
///
/// Iteration is in location order (row, then column) so the serialized turn
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBook {
    slots: BTreeMap<Location, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens an empty slot at `loc`, replacing whatever was there.
    pub fn open(&mut self, loc: Location) {
        self.slots.insert(loc, Order::default());
    }

    /// Appends a move to the slot at `loc`, opening it if needed.
    pub fn push(&mut self, loc: Location, m: Move) {
        self.slots.entry(loc).or_default().moves.push(m);
    }

    /// Appends a free-form argument to the slot at `loc`.
    pub fn push_argument(&mut self, loc: Location, arg: String) {
        self.slots.entry(loc).or_default().arguments.push(arg);
    }

    /// Removes the whole slot at `loc`, returning what was queued.
    pub fn cancel(&mut self, loc: Location) -> Option<Order> {
        self.slots.remove(&loc)
    }

    pub fn get(&self, loc: Location) -> Option<&Order> {
        self.slots.get(&loc)
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.slots.contains_key(&loc)
    }

    /// Where a pirate starting at `loc` ends up after its queued steps.
    pub fn destination_of(&self, geometry: &Geometry, loc: Location) -> Location {
        match self.slots.get(&loc) {
            Some(order) => geometry.destination(loc, &order.steps()),
            None => loc,
        }
    }

    /// True if no slot would end its turn on `target`.
    pub fn is_free(&self, geometry: &Geometry, target: Location) -> bool {
        self.slots
            .iter()
            .all(|(&loc, order)| geometry.destination(loc, &order.steps()) != target)
    }

    /// Slots with at least one queued move, in location order.
    pub fn pending(&self) -> impl Iterator<Item = (Location, &Order)> {
        self.slots
            .iter()
            .filter(|(_, order)| !order.is_empty())
            .map(|(&loc, order)| (loc, order))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
