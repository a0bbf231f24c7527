use serde::{Deserialize, Serialize};

use super::board::{rotate, Board, Cell, Direction, Tile, WIN_TILE};

/// One elementary tile operation, in replay order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileOp {
    /// The tile at `from` moves to the empty cell `to`.
    Slide { from: Cell, to: Cell },
    /// The tiles at `first` and `second` collapse into one tile of `value` at `into`.
    ///
    /// `into` is either `first` itself or an empty cell before it.
    Merge { first: Cell, second: Cell, into: Cell, value: Tile },
}

/// What a single sweep did to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sweep {
    pub moved: bool,
    pub merged: bool,
    pub score_delta: u64,
    /// Some merge produced a tile of at least `WIN_TILE`.
    pub won: bool,
    /// Rotated rows whose far-edge cell is occupied after the sweep.
    pub edge_filled: usize,
    pub ops: Vec<TileOp>,
}

/// Slide and merge every tile of `board` towards `direction`, in place.
///
/// Each line is compacted as a left sweep in coordinates rotated by
/// [`Direction::angle`]. A tile merges at most once per sweep, with the nearest
/// occupied tile behind it, and only when both hold the same value.
///
/// ```
/// use game_2048::engine::{sweep, Board, Direction};
/// let mut b = Board::from_rows(&vec![
///     vec![2, 2, 4, 0],
///     vec![0; 4],
///     vec![0; 4],
///     vec![0; 4],
/// ]).unwrap();
/// let s = sweep(&mut b, Direction::Left);
/// assert!(s.moved && s.merged);
/// assert_eq!(s.score_delta, 4);
/// assert_eq!(b.to_rows()[0], vec![4, 4, 0, 0]);
/// ```
pub fn sweep(board: &mut Board, direction: Direction) -> Sweep {
    let angle = direction.angle();
    let side = board.side();
    let mut out = Sweep::default();
    for row in 0..side {
        sweep_row(board, row, angle, &mut out);
        if board.get(rotate(side, row, side - 1, angle)).is_some() {
            out.edge_filled += 1;
        }
    }
    out
}

fn sweep_row(board: &mut Board, row: usize, angle: u16, out: &mut Sweep) {
    let side = board.side();
    let at = |column: usize| rotate(side, row, column, angle);
    let mut next = 0;
    let mut a = 0;
    while a < side {
        let first = at(a);
        let Some(value) = board.get(first) else {
            a += 1;
            continue;
        };
        let Some(b) = (a + 1..side).find(|&b| board.get(at(b)).is_some()) else {
            // Last tile of the line.
            if a != next {
                slide(board, first, at(next), out);
            }
            return;
        };
        let second = at(b);
        // A pair whose doubled value does not fit in `Tile` is treated as unequal.
        let merged = value.checked_mul(2).filter(|_| board.get(second) == Some(value));
        if let Some(merged) = merged {
            let into = at(next);
            board.take(first);
            board.take(second);
            board.set(into, Some(merged));
            out.ops.push(TileOp::Merge { first, second, into, value: merged });
            out.moved = true;
            out.merged = true;
            out.score_delta = out.score_delta.saturating_add(u64::from(merged));
            out.won |= merged >= WIN_TILE;
            a = b + 1;
        } else {
            if a != next {
                slide(board, first, at(next), out);
            }
            if b != next + 1 {
                slide(board, second, at(next + 1), out);
            }
            // The second tile now sits at `next + 1` and may still merge further on.
            a = next + 1;
        }
        next += 1;
    }
}

#[inline]
fn slide(board: &mut Board, from: Cell, to: Cell, out: &mut Sweep) {
    debug_assert!(board.get(to).is_none(), "slide target {to:?} occupied");
    let tile = board.take(from);
    board.set(to, tile);
    out.ops.push(TileOp::Slide { from, to });
    out.moved = true;
}
