//! Turn loop.
//!
//! Reads protocol lines from an input port, accumulating them until `ready`
//! (setup block) or `go` (update block), and answers on an output port.
//! Each update runs the bot once, cancels friendly collisions, then writes
//! the orders and the turn terminator.

use std::fmt;
use std::io::{BufRead, Write};
use std::mem;
use std::panic::{self, AssertUnwindSafe};

use log::{info, trace, warn};

use crate::error::{EngineError, ProtocolError};
use crate::game::PirateGame;
use crate::protocol::wire::{classify_line, InputLine};

/// Decision logic, invoked once per turn.
pub trait Bot {
    fn do_turn(&mut self, game: &mut PirateGame) -> anyhow::Result<()>;
}

impl<F> Bot for F
where
    F: FnMut(&mut PirateGame) -> anyhow::Result<()>,
{
    fn do_turn(&mut self, game: &mut PirateGame) -> anyhow::Result<()> {
        self(game)
    }
}

/// A bot that never orders anything. Every turn is answered with a bare
/// `go`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleBot;

impl Bot for IdleBot {
    fn do_turn(&mut self, _game: &mut PirateGame) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Where the loop is within the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Uninitialized,
    Configured,
    AwaitingTurn,
    CallbackRunning,
    Resolving,
    Emitting,
    Terminated,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Drives one bot through a game.
pub struct Engine<B> {
    bot: B,
    game: Option<PirateGame>,
    buffer: String,
    phase: TurnPhase,
}

impl<B: Bot> Engine<B> {
    pub fn new(bot: B) -> Self {
        Engine {
            bot,
            game: None,
            buffer: String::new(),
            phase: TurnPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The game, once the setup block has been received.
    pub fn game(&self) -> Option<&PirateGame> {
        self.game.as_ref()
    }

    pub fn bot(&self) -> &B {
        &self.bot
    }

    /// Processes lines until the input closes.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), EngineError> {
        for line in input.lines() {
            self.handle_line(&line?, out)?;
        }
        enter(&mut self.phase, TurnPhase::Terminated);
        info!(
            "input closed after turn {}",
            self.game.as_ref().map_or(0, PirateGame::turn)
        );
        Ok(())
    }

    /// Feeds a single input line.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<(), EngineError> {
        match classify_line(line) {
            InputLine::Ready => self.handle_ready(out),
            InputLine::Go => self.handle_go(out),
            InputLine::Data(text) => {
                self.buffer.push_str(text);
                self.buffer.push('\n');
                Ok(())
            }
        }
    }

    /// Parses the accumulated setup block and acknowledges it.
    fn handle_ready<W: Write>(&mut self, out: &mut W) -> Result<(), EngineError> {
        let block = mem::take(&mut self.buffer);
        let mut game = PirateGame::from_setup(&block)?;
        info!(
            "setup: {}x{} board, cyclic={}, {} players",
            game.rows(),
            game.cols(),
            game.config().cyclic,
            game.config().num_players
        );
        game.finish_turn(out)?;
        self.game = Some(game);
        enter(&mut self.phase, TurnPhase::Configured);
        Ok(())
    }

    /// Runs one full turn on the accumulated update block.
    fn handle_go<W: Write>(&mut self, out: &mut W) -> Result<(), EngineError> {
        let block = mem::take(&mut self.buffer);
        let game = self.game.as_mut().ok_or(ProtocolError::UpdateBeforeSetup)?;
        game.update(&block)?;

        enter(&mut self.phase, TurnPhase::CallbackRunning);
        run_bot(&mut self.bot, game)?;

        enter(&mut self.phase, TurnPhase::Resolving);
        game.cancel_collisions();

        enter(&mut self.phase, TurnPhase::Emitting);
        game.finish_turn(out)?;

        enter(&mut self.phase, TurnPhase::AwaitingTurn);
        Ok(())
    }
}

fn enter(phase: &mut TurnPhase, next: TurnPhase) {
    trace!("{} -> {}", phase, next);
    *phase = next;
}

/// Invokes the bot. With error recovery on, failures and panics are
/// reported on the debug channel and the turn carries on.
fn run_bot<B: Bot>(bot: &mut B, game: &mut PirateGame) -> Result<(), EngineError> {
    if !game.should_recover_errors() {
        return bot.do_turn(game).map_err(|e| EngineError::Bot {
            turn: game.turn(),
            reason: format!("{:#}", e),
        });
    }

    let failure = match panic::catch_unwind(AssertUnwindSafe(|| bot.do_turn(game))) {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(e)) => format!("{:?}", e),
        Err(payload) => panic_message(payload.as_ref()),
    };
    warn!("turn {}: bot failed: {}", game.turn(), failure);
    game.debug(format!("Exception occurred during do_turn: \n{}", failure));
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic with non-string payload".to_string()
    }
}
