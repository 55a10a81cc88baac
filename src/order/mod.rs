//! Orders and friendly-collision resolution.

pub mod book;
pub mod collision;

pub use book::{Move, Order, OrderBook};
pub use collision::{cancel_collisions, find_collisions, Collision};
