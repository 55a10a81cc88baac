//! Corsair client engine library.
//!
//! Parses the pirates game protocol into per-turn state, answers the
//! geometry queries a bot needs, collects its orders, cancels friendly
//! collisions and writes the turn back out.

pub mod board;
pub mod engine;
pub mod error;
pub mod game;
pub mod order;
pub mod protocol;

pub use engine::{Bot, Engine, IdleBot, TurnPhase};
pub use error::{EngineError, GameError, ProtocolError};
pub use game::PirateGame;
