//! Setup block parsing.
//!
//! The setup block arrives once, before the first `ready`, as
//! `key value...` lines. Keys are case-insensitive and unknown keys are
//! ignored so newer servers can add rule constants freely.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::Geometry;
use crate::error::ProtocolError;

/// Rule constants and timing limits for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Milliseconds allowed for setup.
    pub load_time: i32,
    /// Milliseconds allowed per turn.
    pub turn_time: i32,
    pub rows: i32,
    pub cols: i32,
    pub spawn_turns: i32,
    pub reload_turns: i32,
    pub defense_expiration_turns: i32,
    pub sober_turns: i32,
    pub spawn_radius2: i32,
    pub attack_radius2: i32,
    pub view_radius2: i32,
    pub actions_per_turn: i32,
    pub max_points: i32,
    pub max_turns: i32,
    pub num_players: i32,
    pub player_seed: Option<i64>,
    pub cyclic: bool,
    pub recover_errors: bool,
    /// Turn counter before the first update; the first update is this + 1.
    pub start_turn: i32,
    /// Every player's name, ours first.
    pub bot_names: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            load_time: 0,
            turn_time: 0,
            rows: 0,
            cols: 0,
            spawn_turns: 0,
            reload_turns: 0,
            defense_expiration_turns: 0,
            sober_turns: 0,
            spawn_radius2: 0,
            attack_radius2: 0,
            view_radius2: 0,
            actions_per_turn: 0,
            max_points: 0,
            max_turns: 0,
            num_players: 0,
            player_seed: None,
            cyclic: true,
            recover_errors: true,
            start_turn: 0,
            bot_names: Vec::new(),
        }
    }
}

impl GameConfig {
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.rows, self.cols, self.cyclic)
    }

    /// Names of the other players, in server order.
    pub fn opponent_names(&self) -> &[String] {
        self.bot_names.get(1..).unwrap_or(&[])
    }
}

/// Parses a whitespace-separated integer field, tagging failures with the
/// line they came from.
pub(crate) fn parse_int<T: std::str::FromStr>(
    token: &str,
    line: usize,
    content: &str,
) -> Result<T, ProtocolError> {
    token.parse::<T>().map_err(|_| ProtocolError::InvalidInteger {
        line,
        token: token.to_string(),
        content: content.to_string(),
    })
}

/// Parses the setup block into a `GameConfig`.
pub fn parse_setup(block: &str) -> Result<GameConfig, ProtocolError> {
    let mut config = GameConfig::default();

    for (idx, raw) in block.lines().enumerate() {
        let line_no = idx + 1;
        let content = raw.trim();
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() < 2 {
            continue;
        }
        let key = tokens[0].to_ascii_lowercase();
        let value = tokens[1];
        let int = |v: &str| parse_int::<i32>(v, line_no, content);

        match key.as_str() {
            "loadtime" => config.load_time = int(value)?,
            "turntime" => config.turn_time = int(value)?,
            "rows" => config.rows = int(value)?,
            "cols" => config.cols = int(value)?,
            "spawn_turns" => config.spawn_turns = int(value)?,
            "reload_turns" => config.reload_turns = int(value)?,
            "defense_expiration_turns" => config.defense_expiration_turns = int(value)?,
            "sober_turns" => config.sober_turns = int(value)?,
            "spawnradius2" => config.spawn_radius2 = int(value)?,
            "attackradius2" => config.attack_radius2 = int(value)?,
            "viewradius2" => config.view_radius2 = int(value)?,
            "actions_per_turn" => config.actions_per_turn = int(value)?,
            "maxpoints" => config.max_points = int(value)?,
            "max_turns" => config.max_turns = int(value)?,
            "numplayers" => config.num_players = int(value)?,
            "player_seed" => config.player_seed = Some(parse_int::<i64>(value, line_no, content)?),
            "cyclic" => config.cyclic = int(value)? != 0,
            "recover_errors" => config.recover_errors = int(value)? == 1,
            "start_turn" => config.start_turn = int(value)?,
            "bot_names" => {
                config.bot_names = tokens[1..].iter().map(|s| s.to_string()).collect();
            }
            other => debug!("setup: ignoring unknown key '{}'", other),
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETUP: &str = "\
loadtime 3000
turntime 1000
rows 31
cols 43
spawn_turns 5
reload_turns 7
defense_expiration_turns 3
sober_turns 4
spawnradius2 9
attackradius2 5
viewradius2 77
actions_per_turn 6
maxpoints 20
max_turns 500
numplayers 2
player_seed 42
cyclic 0
recover_errors 1
start_turn 0
bot_names me Blackbeard
";

    #[test]
    fn parses_every_known_key() {
        let config = parse_setup(SETUP).unwrap();
        assert_eq!(config.load_time, 3000);
        assert_eq!(config.turn_time, 1000);
        assert_eq!((config.rows, config.cols), (31, 43));
        assert_eq!(config.spawn_turns, 5);
        assert_eq!(config.reload_turns, 7);
        assert_eq!(config.defense_expiration_turns, 3);
        assert_eq!(config.sober_turns, 4);
        assert_eq!(config.spawn_radius2, 9);
        assert_eq!(config.attack_radius2, 5);
        assert_eq!(config.view_radius2, 77);
        assert_eq!(config.actions_per_turn, 6);
        assert_eq!(config.max_points, 20);
        assert_eq!(config.max_turns, 500);
        assert_eq!(config.num_players, 2);
        assert_eq!(config.player_seed, Some(42));
        assert!(!config.cyclic);
        assert!(config.recover_errors);
        assert_eq!(config.start_turn, 0);
        assert_eq!(config.opponent_names(), ["Blackbeard".to_string()]);
    }

    #[test]
    fn defaults_wrap_and_recover() {
        let config = parse_setup("").unwrap();
        assert!(config.cyclic);
        assert!(config.recover_errors);
        assert!(config.player_seed.is_none());
        assert!(config.opponent_names().is_empty());
    }

    #[test]
    fn unknown_keys_and_short_lines_are_ignored() {
        let config = parse_setup("rows 4\nflavour vanilla\nlonely\n\n  COLS 5  \n").unwrap();
        assert_eq!((config.rows, config.cols), (4, 5));
    }

    #[test]
    fn recover_errors_only_on_one() {
        assert!(!parse_setup("recover_errors 2").unwrap().recover_errors);
        assert!(!parse_setup("recover_errors 0").unwrap().recover_errors);
    }

    #[test]
    fn bad_integer_is_rejected_with_line() {
        let err = parse_setup("rows 10\ncols ten\n").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidInteger {
                line: 2,
                token: "ten".to_string(),
                content: "cols ten".to_string(),
            }
        );
    }

    #[test]
    fn config_serializes_with_field_names() {
        let config = parse_setup("rows 3\ncols 4\n").unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["rows"], 3);
        assert_eq!(json["cols"], 4);
        assert_eq!(json["cyclic"], true);
    }
}
