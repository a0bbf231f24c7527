//! Rendering collaborator seam.
//!
//! The engine never draws anything. A front end implements [`TileView`] and
//! feeds each turn's [`MoveOutcome`] through [`replay`]; once its own
//! animation (if any) has finished it calls `Session::settle`.

use std::fmt;

use crate::engine::{Board, Cell, Tile, TileOp};
use crate::session::MoveOutcome;

/// Visual tile operations a front end has to provide.
pub trait TileView {
    /// Show a new tile at `cell`.
    fn place(&mut self, cell: Cell, value: Tile);
    /// Drop the tile shown at `cell`.
    fn remove(&mut self, cell: Cell);
    /// Move the tile shown at `from` to `to`.
    fn slide(&mut self, from: Cell, to: Cell);
    /// Change the number shown on the tile at `cell`.
    fn relabel(&mut self, cell: Cell, value: Tile);
    /// Drop every tile.
    fn clear(&mut self);

    /// Collapse two tiles into one at `into`.
    fn merge(&mut self, first: Cell, second: Cell, into: Cell, value: Tile) {
        self.remove(first);
        self.slide(second, into);
        self.relabel(into, value);
    }

    /// Called once the operations of a turn have all been issued.
    fn finish(&mut self) {}
}

/// Replay one turn on `view`: every slide and merge in order, then the spawn.
pub fn replay<V: TileView + ?Sized>(outcome: &MoveOutcome, view: &mut V) {
    for op in &outcome.ops {
        match *op {
            TileOp::Slide { from, to } => view.slide(from, to),
            TileOp::Merge { first, second, into, value } => view.merge(first, second, into, value),
        }
    }
    if let Some((cell, value)) = outcome.spawned {
        view.place(cell, value);
    }
    view.finish();
}

/// A view that mirrors the tiles into its own board; used by the terminal
/// front end and to check that a replay reproduces the engine's board.
#[derive(Debug, Clone)]
pub struct MirrorView {
    board: Board,
    turns: u64,
}

impl MirrorView {
    pub fn new(side: usize) -> Self {
        MirrorView { board: Board::new(side), turns: 0 }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of completed sequences (`finish` calls).
    pub fn turns(&self) -> u64 {
        self.turns
    }
}

impl TileView for MirrorView {
    fn place(&mut self, cell: Cell, value: Tile) {
        self.board.set(cell, Some(value));
    }

    fn remove(&mut self, cell: Cell) {
        self.board.take(cell);
    }

    fn slide(&mut self, from: Cell, to: Cell) {
        let tile = self.board.take(from);
        self.board.set(to, tile);
    }

    fn relabel(&mut self, cell: Cell, value: Tile) {
        self.board.set(cell, Some(value));
    }

    fn clear(&mut self) {
        self.board.clear();
    }

    fn finish(&mut self) {
        self.turns += 1;
    }
}

impl fmt::Display for MirrorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}
