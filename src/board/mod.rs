//! Board representation: coordinates, entities, the cell grid, geometry and
//! visibility.

pub mod entity;
pub mod geometry;
pub mod grid;
pub mod location;
pub mod vision;

pub use entity::{Owner, Pirate, Treasure};
pub use geometry::Geometry;
pub use grid::{Cell, Grid};
pub use location::{Direction, Location, Positioned};
pub use vision::{disc_offsets, Vision};
