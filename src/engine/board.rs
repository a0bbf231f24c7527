use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serialization::SnapshotError;

/// A tile value: a power of two, never below 2.
pub type Tile = u32;

/// Smallest supported board side.
pub const MIN_SIDE: usize = 4;
/// Largest supported board side.
pub const MAX_SIDE: usize = 6;
/// Value of every freshly spawned tile.
pub const SPAWN_TILE: Tile = 2;
/// A merge reaching this value wins the game.
pub const WIN_TILE: Tile = 2048;

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

    /// Rotation (degrees) that turns a sweep in this direction into a left sweep.
    #[inline]
    pub fn angle(self) -> u16 {
        match self {
            Direction::Left => 0,
            Direction::Up => 90,
            Direction::Right => 180,
            Direction::Down => 270,
        }
    }
}

/// A (row, column) coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Cell { row, column }
    }
}

/// Map a position of a virtual left sweep back to real board coordinates.
///
/// Row `row` of the rotated frame is swept from column 0 upwards; the returned
/// cell is where that position lives on the unrotated board of side `side`.
///
/// Panics if `angle` is not one of 0, 90, 180 or 270.
pub fn rotate(side: usize, row: usize, column: usize, angle: u16) -> Cell {
    let last = side as isize - 1;
    let (cos, sin, offset_row, offset_column) = match angle {
        0 => return Cell::new(row, column),
        90 => (0, 1, 0, last),
        180 => (-1, 0, last, last),
        270 => (0, -1, last, 0),
        _ => panic!("rotation angle must be 0, 90, 180 or 270, got {angle}"),
    };
    let (r, c) = (row as isize, column as isize);
    Cell::new(
        (offset_row + c * sin + r * cos) as usize,
        (offset_column + c * cos - r * sin) as usize,
    )
}

/// Square board of optional tiles, stored row-major.
///
/// The side length is fixed at construction and is always within
/// `MIN_SIDE..=MAX_SIDE`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    side: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Panics if `side` is outside `MIN_SIDE..=MAX_SIDE`.
    ///
    /// ```
    /// use game_2048::engine::Board;
    /// let b = Board::new(5);
    /// assert_eq!(b.count_empty(), 25);
    /// ```
    pub fn new(side: usize) -> Self {
        assert!(
            Self::is_valid_side(side),
            "board side must be within {MIN_SIDE}..={MAX_SIDE}, got {side}"
        );
        Board { side, cells: vec![None; side * side] }
    }

    #[inline]
    pub fn is_valid_side(side: usize) -> bool {
        (MIN_SIDE..=MAX_SIDE).contains(&side)
    }

    /// Build a board from rows of values where 0 marks an empty cell.
    pub fn from_rows(rows: &[Vec<Tile>]) -> Result<Self, SnapshotError> {
        let side = rows.len();
        if !Self::is_valid_side(side) {
            return Err(SnapshotError::Side(side));
        }
        let mut board = Board::new(side);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != side {
                return Err(SnapshotError::Shape { expected: side });
            }
            for (column, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    v if v >= SPAWN_TILE && v.is_power_of_two() => {
                        board.set(Cell::new(row, column), Some(v))
                    }
                    v => return Err(SnapshotError::Tile(v)),
                }
            }
        }
        Ok(board)
    }

    /// Rows of values with 0 for empty cells.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.cells
            .chunks(self.side)
            .map(|row| row.iter().map(|t| t.unwrap_or(0)).collect())
            .collect()
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        debug_assert!(cell.row < self.side && cell.column < self.side, "{cell:?} off board");
        cell.row * self.side + cell.column
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.cells[self.index(cell)]
    }

    #[inline]
    pub(crate) fn set(&mut self, cell: Cell, tile: Option<Tile>) {
        let idx = self.index(cell);
        self.cells[idx] = tile;
    }

    #[inline]
    pub(crate) fn take(&mut self, cell: Cell) -> Option<Tile> {
        let idx = self.index(cell);
        self.cells[idx].take()
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Iterate over all occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        let side = self.side;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, t)| t.map(|v| (Cell::new(i / side, i % side), v)))
    }

    /// Iterate over all empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let side = self.side;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_none())
            .map(move |(i, _)| Cell::new(i / side, i % side))
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|t| t.is_none()).count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Highest tile on the board, 0 when empty.
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Place a 2 into a uniformly chosen empty cell and return that cell.
    ///
    /// Panics when the board is full; callers only spawn after a move freed
    /// room or on a fresh board.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Cell {
        let empty: Vec<Cell> = self.empty_cells().collect();
        assert!(!empty.is_empty(), "cannot spawn a tile on a full board");
        let cell = empty[rng.gen_range(0..empty.len())];
        self.set(cell, Some(SPAWN_TILE));
        cell
    }

    /// True when every cell is occupied and no two edge-adjacent tiles match.
    ///
    /// Only right and down neighbours are inspected; every pair is still
    /// covered once.
    pub fn is_over(&self) -> bool {
        let side = self.side;
        for row in 0..side {
            for column in 0..side {
                let Some(value) = self.get(Cell::new(row, column)) else {
                    return false;
                };
                for (dr, dc) in [(0, 1), (1, 0)] {
                    let (r, c) = (row + dr, column + dc);
                    if r < side && c < side && self.get(Cell::new(r, c)).map_or(true, |v| v == value) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board").field("side", &self.side).field("rows", &self.to_rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.side * 8);
        writeln!(f)?;
        for (i, row) in self.cells.chunks(self.side).enumerate() {
            let line: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", line.join("|"))?;
            if i + 1 < self.side {
                writeln!(f, "{rule}")?;
            }
        }
        Ok(())
    }
}

fn format_val(val: &Option<Tile>) -> String {
    match val {
        None => String::from("       "),
        Some(v) => format!("{v:^7}"),
    }
}
