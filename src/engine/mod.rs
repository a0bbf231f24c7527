//! Engine module: square 2048 board, coordinate rotation and the slide/merge
//! sweep. Public API stays small and ergonomic.
//!
//! - `Board` is the NxN grid (N in 4..=6) with spawn and terminal checks.
//! - `sweep` compacts and merges every line towards a direction, reporting
//!   the elementary tile operations it performed.
//! - Every direction is handled as a left sweep through `rotate`.

mod board;
mod sweep;

pub use board::{rotate, Board, Cell, Direction, Tile, MAX_SIDE, MIN_SIDE, SPAWN_TILE, WIN_TILE};
pub use sweep::{sweep, Sweep, TileOp};
