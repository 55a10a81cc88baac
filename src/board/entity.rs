//! Pirates, treasures and ownership.
//!
//! Both entity kinds are rebuilt from scratch on every update; nothing about
//! them survives a turn except the id the server assigns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::location::{Location, Positioned};

/// The player index owning an entity, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Owner(pub i32);

impl Owner {
    /// The local player.
    pub const ME: Owner = Owner(0);
    /// The opponent in a two-player game.
    pub const ENEMY: Owner = Owner(1);
    /// Nobody.
    pub const NONE: Owner = Owner(-1);

    pub const fn is_me(self) -> bool {
        self.0 == Self::ME.0
    }

    /// The opposing side in a two-player game.
    pub const fn opponent(self) -> Owner {
        if self.is_me() {
            Owner::ENEMY
        } else {
            Owner::ME
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pirate ship, alive or lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pirate {
    pub id: u32,
    pub owner: Owner,
    pub location: Location,
    pub initial_location: Location,
    pub is_lost: bool,
    /// Only meaningful while `is_lost`.
    pub turns_to_revive: i32,
    pub turns_to_sober: i32,
    pub reload_turns: i32,
    pub defense_expiration_turns: i32,
    pub has_treasure: bool,
}

impl Pirate {
    /// Creates an active pirate with every counter at zero.
    pub fn new(id: u32, owner: Owner, location: Location, initial_location: Location) -> Self {
        Self {
            id,
            owner,
            location,
            initial_location,
            is_lost: false,
            turns_to_revive: 0,
            turns_to_sober: 0,
            reload_turns: 0,
            defense_expiration_turns: 0,
            has_treasure: false,
        }
    }

    /// True while the pirate cannot take orders.
    pub fn is_drunk(&self) -> bool {
        self.turns_to_sober > 0
    }
}

impl Positioned for Pirate {
    fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Display for Pirate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Pirate ID:{} OWNER:{} LOC:{}>",
            self.id, self.owner, self.location
        )
    }
}

/// A treasure lying on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Treasure {
    pub id: u32,
    pub location: Location,
}

impl Treasure {
    pub fn new(id: u32, location: Location) -> Self {
        Self { id, location }
    }
}

impl Positioned for Treasure {
    fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Display for Treasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Treasure ID:{} LOC:{}>", self.id, self.location)
    }
}
