//! Wire protocol: the setup block, per-turn updates and output framing.

pub mod setup;
pub mod update;
pub mod wire;

pub use setup::{parse_setup, GameConfig};
pub use update::{parse_update, TurnUpdate};
pub use wire::{classify_line, decode_frame, encode_frame, format_order, InputLine, TURN_END};
