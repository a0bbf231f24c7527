//! Game session: board, score bookkeeping and the turn state machine.
//!
//! A [`Session`] is the only mutating surface callers need: [`Session::apply`]
//! performs a full turn (sweep, score, spawn, terminal check) atomically and
//! returns a [`MoveOutcome`] describing it.

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::{self, Board, Cell, Direction, Tile, TileOp, SPAWN_TILE};
use crate::serialization::{Snapshot, SnapshotError};
use crate::view::TileView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    NotStarted,
    Started,
    Won,
    Over,
}

/// Everything one accepted (or rejected) input did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub moved: bool,
    pub merged: bool,
    pub score_delta: u64,
    pub won: bool,
    pub over: bool,
    /// Slides and merges in the order they should be replayed.
    pub ops: Vec<TileOp>,
    /// Tile placed after the sweep, if any.
    pub spawned: Option<(Cell, Tile)>,
}

impl MoveOutcome {
    /// Outcome of an input that changed nothing.
    #[inline]
    pub fn idle() -> Self {
        Self::default()
    }
}

/// How a session was initialised from persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// The saved board was loaded and play continues.
    Resumed,
    /// Nothing usable was saved; a new game was started.
    Fresh,
}

pub struct Session {
    board: Board,
    score: u64,
    best_score: u64,
    state: GameState,
    await_settle: bool,
    in_flight: bool,
    rng: StdRng,
}

impl Session {
    /// Create a session with an empty board and an entropy-seeded RNG.
    ///
    /// The session starts in `NotStarted`; call [`Session::start_new_game`] or
    /// [`Session::load_from_snapshot`] before applying moves.
    pub fn new(side: usize) -> Self {
        Self::with_rng(side, StdRng::from_entropy())
    }

    /// Like [`Session::new`] with a deterministic RNG.
    pub fn with_seed(side: usize, seed: u64) -> Self {
        Self::with_rng(side, StdRng::seed_from_u64(seed))
    }

    /// Build from a validated [`Config`].
    pub fn from_config(config: &Config) -> Self {
        let session = match config.seed {
            Some(seed) => Self::with_seed(config.board_size, seed),
            None => Self::new(config.board_size),
        };
        session.with_await_settle(config.await_settle)
    }

    fn with_rng(side: usize, rng: StdRng) -> Self {
        Session {
            board: Board::new(side),
            score: 0,
            best_score: 0,
            state: GameState::NotStarted,
            await_settle: false,
            in_flight: false,
            rng,
        }
    }

    /// When enabled, every moved turn blocks input until [`Session::settle`].
    pub fn with_await_settle(mut self, on: bool) -> Self {
        self.await_settle = on;
        self
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.board.side()
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// True while a committed turn still waits for its replay to finish.
    #[inline]
    pub fn is_turn_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Signal that the last turn's replay finished; input is accepted again.
    pub fn settle(&mut self) {
        self.in_flight = false;
    }

    /// Clear the board, spawn two tiles and reset the score. Best score is kept.
    pub fn start_new_game(&mut self) {
        self.board.clear();
        self.board.spawn(&mut self.rng);
        self.board.spawn(&mut self.rng);
        self.score = 0;
        self.in_flight = false;
        self.state = GameState::Started;
        info!("new {0}x{0} game (best score {1})", self.side(), self.best_score);
    }

    /// Play one turn towards `direction`.
    ///
    /// Input is ignored unless the game is `Started` and no turn is in flight.
    /// A direction that moves nothing is a no-op: no score, spawn or turn.
    pub fn apply(&mut self, direction: Direction) -> MoveOutcome {
        if self.state != GameState::Started || self.in_flight {
            debug!("dropping {direction:?}: state {:?}, in flight {}", self.state, self.in_flight);
            return MoveOutcome::idle();
        }
        let sweep = engine::sweep(&mut self.board, direction);
        if !sweep.moved {
            return MoveOutcome::idle();
        }

        self.score = self.score.saturating_add(sweep.score_delta);
        if self.score > self.best_score {
            self.best_score = self.score;
        }

        let side = self.side();
        let mut spawned = None;
        let mut over = false;
        if sweep.won {
            self.state = GameState::Won;
            info!("reached {} with score {}", self.board.highest_tile(), self.score);
        } else {
            if sweep.edge_filled < side {
                let cell = self.board.spawn(&mut self.rng);
                spawned = Some((cell, SPAWN_TILE));
            }
            // With two or more open lines a free cell survives the spawn.
            if sweep.edge_filled + 1 >= side && self.board.is_over() {
                self.state = GameState::Over;
                over = true;
                info!("game over with score {}", self.score);
            }
        }
        self.in_flight = self.await_settle;
        debug!(
            "{direction:?}: {} ops, +{} (score {}), spawned {spawned:?}",
            sweep.ops.len(),
            sweep.score_delta,
            self.score
        );

        MoveOutcome {
            moved: true,
            merged: sweep.merged,
            score_delta: sweep.score_delta,
            won: sweep.won,
            over,
            ops: sweep.ops,
            spawned,
        }
    }

    /// Resume from persisted state.
    ///
    /// The best score is always adopted. A blank, malformed or differently
    /// sized board is discarded and a new game starts instead.
    pub fn load_from_snapshot(&mut self, snapshot: &Snapshot) -> Restored {
        self.best_score = snapshot.best_score;
        if snapshot.is_blank() {
            self.start_new_game();
            return Restored::Fresh;
        }
        let side = self.side();
        let board = match Board::from_rows(&snapshot.tiles) {
            Ok(board) if board.side() == side => board,
            Ok(_) => {
                warn!("discarding saved board: {}", SnapshotError::Shape { expected: side });
                self.start_new_game();
                return Restored::Fresh;
            }
            Err(e) => {
                warn!("discarding saved board: {e}");
                self.start_new_game();
                return Restored::Fresh;
            }
        };
        self.board = board;
        self.score = snapshot.score;
        self.best_score = self.best_score.max(self.score);
        self.in_flight = false;
        self.state = if self.board.is_over() { GameState::Over } else { GameState::Started };
        info!("resumed {0}x{0} game at score {1}", side, self.score);
        Restored::Resumed
    }

    /// Current board, score and best score.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot { tiles: self.board.to_rows(), score: self.score, best_score: self.best_score }
    }

    /// Draw the whole board from scratch on `view`.
    pub fn render<V: TileView + ?Sized>(&self, view: &mut V) {
        view.clear();
        for (cell, value) in self.board.tiles() {
            view.place(cell, value);
        }
        view.finish();
    }
}
