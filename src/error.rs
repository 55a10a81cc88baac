//! Error types shared across the crate.

use thiserror::Error;

use crate::board::Location;

/// Errors returned synchronously to the bot from game queries and orders.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("pirate {attacker} cannot attack teammate {target}")]
    TeammateAttack { attacker: u32, target: u32 },

    #[error("moves must be non negative, got {0}")]
    NegativeMoves(i32),
}

/// Errors raised while parsing the setup or update blocks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("line {line}: expected at least {expected} fields in '{content}'")]
    MissingFields {
        line: usize,
        expected: usize,
        content: String,
    },

    #[error("line {line}: invalid integer '{token}' in '{content}'")]
    InvalidInteger {
        line: usize,
        token: String,
        content: String,
    },

    #[error("line {line}: location {location} is off the board")]
    OffBoard { line: usize, location: Location },

    #[error("line {line}: duplicate pirate id {id}")]
    DuplicatePirate { line: usize, id: u32 },

    #[error("update received before the setup block")]
    UpdateBeforeSetup,
}

/// Errors that end the turn loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("bot failed on turn {turn}: {reason}")]
    Bot { turn: i32, reason: String },
}
