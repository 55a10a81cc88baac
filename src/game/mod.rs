//! Game state exposed to the bot.
//!
//! `PirateGame` holds the rule constants, the cumulative wall grid and the
//! score arrays across turns, plus a fresh `TurnSnapshot` and `OrderBook`
//! for the turn in progress. Bots query it and queue orders on it; the turn
//! loop then resolves collisions and serializes the book.

pub mod snapshot;

use std::io::{self, Write};
use std::time::Instant;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{
    disc_offsets, Direction, Geometry, Grid, Location, Owner, Pirate, Positioned, Treasure,
};
use crate::error::{GameError, ProtocolError};
use crate::order::{cancel_collisions, Move, OrderBook};
use crate::protocol::wire::{encode_frame, format_order, DEBUG_TAG, STOP_TAG, TURN_END};
use crate::protocol::{parse_setup, parse_update, GameConfig};

pub use snapshot::TurnSnapshot;

/// The first turn gets this many times the usual time budget.
const FIRST_TURN_TIME_FACTOR: i64 = 10;

/// Authoritative client-side game state.
pub struct PirateGame {
    config: GameConfig,
    geometry: Geometry,
    grid: Grid,
    vision_offsets: Vec<(i32, i32)>,
    rng: SmallRng,
    turn: i32,
    turn_started: Instant,
    scores: Vec<i32>,
    last_turn_points: Vec<i32>,
    snapshot: TurnSnapshot,
    orders: OrderBook,
    /// Framed diagnostic lines waiting for the next flush.
    outbox: Vec<String>,
}

impl PirateGame {
    /// Creates a game from already-parsed rule constants.
    pub fn new(config: GameConfig) -> Self {
        let geometry = config.geometry();
        let players = config.num_players.max(0) as usize;
        let rng = match config.player_seed {
            Some(seed) => SmallRng::seed_from_u64(seed as u64),
            None => SmallRng::from_entropy(),
        };
        PirateGame {
            grid: Grid::new(config.rows, config.cols),
            vision_offsets: disc_offsets(config.view_radius2, config.rows.max(config.cols)),
            turn: config.start_turn,
            scores: vec![0; players],
            last_turn_points: vec![0; players],
            geometry,
            rng,
            turn_started: Instant::now(),
            snapshot: TurnSnapshot::default(),
            orders: OrderBook::new(),
            outbox: Vec::new(),
            config,
        }
    }

    /// Parses the setup block and creates the game.
    pub fn from_setup(block: &str) -> Result<Self, ProtocolError> {
        Ok(Self::new(parse_setup(block)?))
    }

    /// Starts a new turn from an update block.
    ///
    /// The previous turn's pirates, treasures, orders and visibility are
    /// discarded; walls accumulate and scores are replaced when the block
    /// carries them. On error nothing is changed.
    pub fn update(&mut self, block: &str) -> Result<(), ProtocolError> {
        let update = parse_update(block, &self.geometry)?;

        self.turn_started = Instant::now();
        self.turn += 1;
        for wall in &update.walls {
            self.grid.mark_wall(*wall);
        }
        if let Some(scores) = update.scores {
            self.scores = scores;
        }
        if let Some(points) = update.last_turn_points {
            self.last_turn_points = points;
        }

        self.orders.clear();
        for pirate in &update.pirates {
            self.orders.open(pirate.location);
        }
        self.snapshot = TurnSnapshot::new(update.pirates, update.treasures);

        debug!(
            "turn {}: {} pirates, {} treasures, {} walls",
            self.turn,
            self.snapshot.all().len(),
            self.snapshot.treasures().len(),
            self.grid.wall_count()
        );
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn rows(&self) -> i32 {
        self.config.rows
    }

    pub fn cols(&self) -> i32 {
        self.config.cols
    }

    pub fn turn(&self) -> i32 {
        self.turn
    }

    pub fn max_turns(&self) -> i32 {
        self.config.max_turns
    }

    pub fn max_points(&self) -> i32 {
        self.config.max_points
    }

    pub fn actions_per_turn(&self) -> i32 {
        self.config.actions_per_turn
    }

    /// Squared attack radius.
    pub fn attack_radius(&self) -> i32 {
        self.config.attack_radius2
    }

    pub fn reload_turns(&self) -> i32 {
        self.config.reload_turns
    }

    pub fn defense_expiration_turns(&self) -> i32 {
        self.config.defense_expiration_turns
    }

    pub fn sober_turns(&self) -> i32 {
        self.config.sober_turns
    }

    pub fn spawn_turns(&self) -> i32 {
        self.config.spawn_turns
    }

    pub fn should_recover_errors(&self) -> bool {
        self.config.recover_errors
    }

    /// Name of the last listed opponent, if the server sent any.
    pub fn opponent_name(&self) -> Option<&str> {
        self.config.opponent_names().last().map(String::as_str)
    }

    /// Milliseconds left in this turn's budget; negative once overdrawn.
    pub fn time_remaining(&self) -> i64 {
        let factor = if self.turn == 1 { FIRST_TURN_TIME_FACTOR } else { 1 };
        let budget = factor * self.config.turn_time as i64;
        budget - self.turn_started.elapsed().as_millis() as i64
    }

    /// Random source seeded from `player_seed` when the server sent one.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    pub fn scores(&self) -> &[i32] {
        &self.scores
    }

    pub fn last_turn_points(&self) -> &[i32] {
        &self.last_turn_points
    }

    pub fn my_score(&self) -> i32 {
        self.scores.get(Owner::ME.0 as usize).copied().unwrap_or(0)
    }

    pub fn enemy_score(&self) -> i32 {
        let enemy = Owner::ME.opponent().0 as usize;
        self.scores.get(enemy).copied().unwrap_or(0)
    }

    fn mine_where(&self, keep: impl Fn(&Pirate) -> bool) -> Vec<Pirate> {
        self.snapshot.mine().iter().copied().filter(|p| keep(p)).collect()
    }

    fn enemy_where(&self, keep: impl Fn(&Pirate) -> bool) -> Vec<Pirate> {
        self.snapshot.enemy().iter().copied().filter(|p| keep(p)).collect()
    }

    /// Every pirate of ours, lost ones included, sorted by id.
    pub fn all_my_pirates(&self) -> Vec<Pirate> {
        self.snapshot.mine().to_vec()
    }

    /// Our pirates still afloat.
    pub fn my_pirates(&self) -> Vec<Pirate> {
        self.mine_where(|p| !p.is_lost)
    }

    pub fn my_lost_pirates(&self) -> Vec<Pirate> {
        self.mine_where(|p| p.is_lost)
    }

    pub fn my_drunk_pirates(&self) -> Vec<Pirate> {
        self.mine_where(|p| !p.is_lost && p.is_drunk())
    }

    pub fn my_sober_pirates(&self) -> Vec<Pirate> {
        self.mine_where(|p| !p.is_lost && !p.is_drunk())
    }

    pub fn my_pirates_with_treasures(&self) -> Vec<Pirate> {
        self.mine_where(|p| !p.is_lost && p.has_treasure)
    }

    pub fn my_pirates_without_treasures(&self) -> Vec<Pirate> {
        self.mine_where(|p| !p.is_lost && !p.has_treasure)
    }

    pub fn all_enemy_pirates(&self) -> Vec<Pirate> {
        self.snapshot.enemy().to_vec()
    }

    pub fn enemy_pirates(&self) -> Vec<Pirate> {
        self.enemy_where(|p| !p.is_lost)
    }

    pub fn enemy_lost_pirates(&self) -> Vec<Pirate> {
        self.enemy_where(|p| p.is_lost)
    }

    pub fn enemy_drunk_pirates(&self) -> Vec<Pirate> {
        self.enemy_where(|p| !p.is_lost && p.is_drunk())
    }

    pub fn enemy_sober_pirates(&self) -> Vec<Pirate> {
        self.enemy_where(|p| !p.is_lost && !p.is_drunk())
    }

    pub fn enemy_pirates_with_treasures(&self) -> Vec<Pirate> {
        self.enemy_where(|p| !p.is_lost && p.has_treasure)
    }

    pub fn enemy_pirates_without_treasures(&self) -> Vec<Pirate> {
        self.enemy_where(|p| !p.is_lost && !p.has_treasure)
    }

    pub fn my_pirate(&self, id: u32) -> Option<Pirate> {
        self.snapshot.mine().iter().copied().find(|p| p.id == id)
    }

    pub fn enemy_pirate(&self, id: u32) -> Option<Pirate> {
        self.snapshot.enemy().iter().copied().find(|p| p.id == id)
    }

    /// The active pirate standing on `loc`, of either side.
    pub fn pirate_on(&self, loc: Location) -> Option<Pirate> {
        self.snapshot.pirate_on(loc)
    }

    /// Treasures sorted by id.
    pub fn treasures(&self) -> Vec<Treasure> {
        self.snapshot.treasures().to_vec()
    }

    pub fn distance<A: Positioned, B: Positioned>(&self, a: &A, b: &B) -> i32 {
        self.geometry.distance(a.location(), b.location())
    }

    pub fn directions<A: Positioned, B: Positioned>(&self, from: &A, to: &B) -> Vec<Direction> {
        self.geometry.directions(from.location(), to.location())
    }

    pub fn destination<A: Positioned>(&self, from: &A, steps: &[Direction]) -> Location {
        self.geometry.destination(from.location(), steps)
    }

    /// True if `b` is within attack range of `a`.
    pub fn in_range<A: Positioned, B: Positioned>(&self, a: &A, b: &B) -> bool {
        self.geometry
            .in_range(a.location(), b.location(), self.config.attack_radius2)
    }

    /// Cells `pirate` could reach in `moves` steps while heading for
    /// `target`.
    pub fn sail_options<T: Positioned>(
        &self,
        pirate: &Pirate,
        target: &T,
        moves: i32,
    ) -> Result<Vec<Location>, GameError> {
        self.geometry
            .sail_options(pirate.location, target.location(), moves)
    }

    /// On the board and not a wall.
    pub fn is_passable(&self, loc: Location) -> bool {
        self.grid.is_passable(loc)
    }

    /// Some active pirate stands on `loc`.
    pub fn is_occupied(&self, loc: Location) -> bool {
        self.snapshot
            .all()
            .iter()
            .any(|p| !p.is_lost && p.location == loc)
    }

    /// No queued order ends its turn on `loc`.
    pub fn is_empty(&self, loc: Location) -> bool {
        self.orders.is_free(&self.geometry, loc)
    }

    /// Whether any of our active pirates can see `loc` this turn.
    pub fn is_visible(&self, loc: Location) -> bool {
        self.snapshot
            .vision(self.geometry, &self.vision_offsets)
            .is_visible(loc)
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Queues the steps leading `pirate` to `destination`.
    pub fn set_sail<T: Positioned>(&mut self, pirate: &Pirate, destination: &T) {
        let steps = self.geometry.directions(pirate.location, destination.location());
        for step in steps {
            self.orders.push(pirate.location, Move::Sail(step));
        }
    }

    /// Queues an attack on `target`. Teammates cannot be attacked.
    pub fn attack(&mut self, pirate: &Pirate, target: &Pirate) -> Result<(), GameError> {
        if pirate.owner == target.owner {
            return Err(GameError::TeammateAttack {
                attacker: pirate.id,
                target: target.id,
            });
        }
        self.orders
            .push(pirate.location, Move::Attack { target: target.id });
        Ok(())
    }

    pub fn defend(&mut self, pirate: &Pirate) {
        self.orders.push(pirate.location, Move::Defend);
    }

    /// Appends a free-form argument to the pirate's order line.
    pub fn add_order_argument(&mut self, pirate: &Pirate, argument: impl Into<String>) {
        self.orders.push_argument(pirate.location, argument.into());
    }

    /// Drops everything queued at `loc`.
    pub fn cancel_order(&mut self, loc: Location) {
        self.orders.cancel(loc);
    }

    /// Drops everything queued for `pirate`.
    pub fn cancel_pirate_order(&mut self, pirate: &Pirate) {
        self.cancel_order(pirate.location);
    }

    /// Cancels orders until no two of our pirates share a destination.
    /// Returns the number of cancelled slots.
    pub fn cancel_collisions(&mut self) -> usize {
        let pirates = self.my_pirates();
        let cancelled = cancel_collisions(&self.geometry, &mut self.orders, &pirates);
        if cancelled > 0 {
            warn!("turn {}: cancelled {} colliding orders", self.turn, cancelled);
            self.debug(format!(
                "WARNING: was forced to cancel collisions for {} pirates",
                cancelled
            ));
        }
        cancelled
    }

    /// Queues a debug message for the server's replay log.
    pub fn debug(&mut self, message: impl AsRef<str>) {
        self.outbox.push(encode_frame(DEBUG_TAG, message.as_ref()));
    }

    /// Queues a stop point, asking the replay viewer to pause here.
    pub fn stop_point(&mut self, message: impl AsRef<str>) {
        self.outbox.push(encode_frame(STOP_TAG, message.as_ref()));
    }

    /// Writes pending diagnostics, every non-empty order and the turn
    /// terminator, then clears the order book.
    pub fn finish_turn<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for line in self.outbox.drain(..) {
            writeln!(out, "{}", line)?;
        }
        for (loc, order) in self.orders.pending() {
            writeln!(out, "{}", format_order(loc, order))?;
        }
        writeln!(out, "{}", TURN_END)?;
        out.flush()?;
        self.orders.clear();
        Ok(())
    }
}
