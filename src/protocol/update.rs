//! Per-turn update block parsing.
//!
//! Grammar, one record per line:
//!
//! ```text
//! w row col                                   wall (cumulative)
//! g s s0 s1 ...                               scores
//! g p p0 p1 ...                               last-turn points
//! t id row col                                treasure
//! a id owner row col srow scol sober tr rl df active pirate
//! d ...                                       same as `a`
//! k id owner row col srow scol revive         lost pirate
//! ```
//!
//! Unknown prefixes are skipped. A known record that is short or carries a
//! non-integer field rejects the whole block: skipping a pirate silently
//! would leave the bot with a wrong picture of the board.

use std::collections::HashSet;

use log::debug;

use super::setup::parse_int;
use crate::board::{Geometry, Location, Owner, Pirate, Treasure};
use crate::error::ProtocolError;

/// Everything one update block carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnUpdate {
    pub walls: Vec<Location>,
    pub pirates: Vec<Pirate>,
    pub treasures: Vec<Treasure>,
    /// Replaces the stored scores when present.
    pub scores: Option<Vec<i32>>,
    /// Replaces the stored last-turn points when present.
    pub last_turn_points: Option<Vec<i32>>,
}

/// Tokenized record plus where it came from, for error reporting.
struct Record<'a> {
    line: usize,
    content: &'a str,
    tokens: Vec<&'a str>,
}

impl<'a> Record<'a> {
    fn require(&self, fields: usize) -> Result<(), ProtocolError> {
        if self.tokens.len() < fields + 1 {
            return Err(ProtocolError::MissingFields {
                line: self.line,
                expected: fields,
                content: self.content.to_string(),
            });
        }
        Ok(())
    }

    fn int<T: std::str::FromStr>(&self, idx: usize) -> Result<T, ProtocolError> {
        parse_int(self.tokens[idx], self.line, self.content)
    }

    fn location(&self, idx: usize) -> Result<Location, ProtocolError> {
        Ok(Location::new(self.int(idx)?, self.int(idx + 1)?))
    }
}

/// Parses an update block. Walls are bounds-checked against `geometry`.
pub fn parse_update(block: &str, geometry: &Geometry) -> Result<TurnUpdate, ProtocolError> {
    let mut update = TurnUpdate::default();
    let mut seen: HashSet<(Owner, u32)> = HashSet::new();

    for (idx, raw) in block.lines().enumerate() {
        let content = raw.trim();
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let record = Record {
            line: idx + 1,
            content,
            tokens,
        };

        match record.tokens[0].to_ascii_lowercase().as_str() {
            "w" => {
                record.require(2)?;
                let location = record.location(1)?;
                if !geometry.contains(location) {
                    return Err(ProtocolError::OffBoard {
                        line: record.line,
                        location,
                    });
                }
                update.walls.push(location);
            }
            "g" => {
                record.require(1)?;
                let values = record.tokens[2..]
                    .iter()
                    .map(|t| parse_int::<i32>(t, record.line, content))
                    .collect::<Result<Vec<_>, _>>()?;
                match record.tokens[1].to_ascii_lowercase().as_str() {
                    "s" => update.scores = Some(values),
                    "p" => update.last_turn_points = Some(values),
                    other => debug!("update: ignoring score kind '{}'", other),
                }
            }
            "t" => {
                record.require(3)?;
                update
                    .treasures
                    .push(Treasure::new(record.int(1)?, record.location(2)?));
            }
            kind @ ("a" | "d" | "k") => {
                let pirate = parse_pirate(&record, kind == "k")?;
                if !seen.insert((pirate.owner, pirate.id)) {
                    return Err(ProtocolError::DuplicatePirate {
                        line: record.line,
                        id: pirate.id,
                    });
                }
                update.pirates.push(pirate);
            }
            other => debug!("update: skipping unknown record '{}'", other),
        }
    }

    Ok(update)
}

fn parse_pirate(record: &Record<'_>, lost: bool) -> Result<Pirate, ProtocolError> {
    record.require(if lost { 7 } else { 10 })?;
    let mut pirate = Pirate::new(
        record.int(1)?,
        Owner(record.int(2)?),
        record.location(3)?,
        record.location(5)?,
    );
    if lost {
        pirate.is_lost = true;
        pirate.turns_to_revive = record.int(7)?;
    } else {
        pirate.turns_to_sober = record.int(7)?;
        pirate.has_treasure = record.int::<i32>(8)? != 0;
        pirate.reload_turns = record.int(9)?;
        pirate.defense_expiration_turns = record.int(10)?;
    }
    Ok(pirate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(20, 20, true)
    }

    #[test]
    fn parses_every_record_kind() {
        let block = "\
w 1 2
g s 3 5
g p 1 0
t 0 4 4
a 0 0 2 2 0 0 1 1 3 2
k 1 0 6 6 0 1 5
d 0 1 9 9 19 19 0 0 0 0
";
        let update = parse_update(block, &geometry()).unwrap();
        assert_eq!(update.walls, vec![Location::new(1, 2)]);
        assert_eq!(update.scores, Some(vec![3, 5]));
        assert_eq!(update.last_turn_points, Some(vec![1, 0]));
        assert_eq!(update.treasures, vec![Treasure::new(0, Location::new(4, 4))]);
        assert_eq!(update.pirates.len(), 3);

        let active = update.pirates[0];
        assert_eq!(active.owner, Owner::ME);
        assert_eq!(active.location, Location::new(2, 2));
        assert_eq!(active.initial_location, Location::new(0, 0));
        assert_eq!(active.turns_to_sober, 1);
        assert!(active.has_treasure);
        assert_eq!(active.reload_turns, 3);
        assert_eq!(active.defense_expiration_turns, 2);
        assert!(!active.is_lost);

        let lost = update.pirates[1];
        assert!(lost.is_lost);
        assert_eq!(lost.turns_to_revive, 5);
        assert_eq!(lost.initial_location, Location::new(0, 1));

        let alias = update.pirates[2];
        assert_eq!(alias.owner, Owner::ENEMY);
        assert!(!alias.is_lost);
        assert_eq!(alias.location, Location::new(9, 9));
    }

    #[test]
    fn blank_and_unknown_lines_are_skipped() {
        let update = parse_update("\n  \nz whatever 1\nturn 4\nt 2 1 1\n", &geometry()).unwrap();
        assert_eq!(update.treasures.len(), 1);
        assert!(update.pirates.is_empty());
    }

    #[test]
    fn empty_score_list_is_allowed() {
        let update = parse_update("g s\n", &geometry()).unwrap();
        assert_eq!(update.scores, Some(Vec::new()));
    }

    #[test]
    fn short_pirate_record_is_rejected() {
        let err = parse_update("t 0 1 1\na 0 0 2 2 0 0\n", &geometry()).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MissingFields {
                line: 2,
                expected: 10,
                content: "a 0 0 2 2 0 0".to_string(),
            }
        );
    }

    #[test]
    fn non_integer_field_is_rejected() {
        let err = parse_update("t one 1 1\n", &geometry()).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidInteger { line: 1, .. }));
    }

    #[test]
    fn off_board_wall_is_rejected() {
        let err = parse_update("w 20 0\n", &geometry()).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::OffBoard {
                line: 1,
                location: Location::new(20, 0),
            }
        );
    }

    #[test]
    fn duplicate_pirate_is_rejected() {
        let block = "a 3 0 1 1 0 0 0 0 0 0\nk 3 0 5 5 0 0 2\n";
        let err = parse_update(block, &geometry()).unwrap_err();
        assert_eq!(err, ProtocolError::DuplicatePirate { line: 2, id: 3 });
    }

    #[test]
    fn same_id_for_different_owners_is_fine() {
        let block = "a 0 0 1 1 0 0 0 0 0 0\na 0 1 5 5 0 0 0 0 0 0\n";
        let update = parse_update(block, &geometry()).unwrap();
        assert_eq!(update.pirates.len(), 2);
    }
}
