//! Line framing for engine output and input-line classification.
//!
//! Orders go out as `o row col <codes>[ args]`, one per non-empty slot,
//! followed by `go`. Debug text (`m`) and stop points (`s`) carry arbitrary
//! UTF-8 as base64 so a single line can hold newlines and anything else.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::board::Location;
use crate::order::Order;

/// Ends every turn's output and acknowledges setup.
pub const TURN_END: &str = "go";

/// Tag for a debug message frame.
pub const DEBUG_TAG: char = 'm';

/// Tag for a stop-point frame.
pub const STOP_TAG: char = 's';

/// What a raw input line means to the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// Setup block is complete.
    Ready,
    /// Update block is complete.
    Go,
    /// Part of the block being accumulated.
    Data(&'a str),
}

/// Classifies one input line, ignoring trailing line terminators.
pub fn classify_line(line: &str) -> InputLine<'_> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.eq_ignore_ascii_case("ready") {
        InputLine::Ready
    } else if line.eq_ignore_ascii_case("go") {
        InputLine::Go
    } else {
        InputLine::Data(line)
    }
}

/// Formats one order slot as an output line.
pub fn format_order(location: Location, order: &Order) -> String {
    format!("o {} {} {}", location.row, location.col, order)
}

/// Frames `message` under `tag` as a single base64 line.
pub fn encode_frame(tag: char, message: &str) -> String {
    format!("{} {}", tag, STANDARD.encode(message.as_bytes()))
}

/// Inverse of `encode_frame`. Returns `None` for anything that is not a
/// well-formed frame.
pub fn decode_frame(line: &str) -> Option<(char, String)> {
    let mut chars = line.chars();
    let tag = chars.next()?;
    let payload = line[tag.len_utf8()..].strip_prefix(' ')?;
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok().map(|text| (tag, text))
}
