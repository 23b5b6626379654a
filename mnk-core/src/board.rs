//! Contains the basic board representation for an m,n,k-game together with the
//! position type, bounds checking and the four line directions used for scanning.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The extension of the board in rows (`m`) and columns (`n`).
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    /// Number of rows.
    pub m: usize,
    /// Number of columns.
    pub n: usize,
}

impl BoardSize {
    pub fn new(m: usize, n: usize) -> Self {
        BoardSize { m, n }
    }

    /// The longer of both sides, which is the upper bound for the win length.
    pub fn longest_side(&self) -> usize {
        self.m.max(self.n)
    }
}

/// Encodes a cell on the board. Origin is the upper left cell.
/// On the wire a position is the two element array `[row, col]`.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Position {
    /// Vertical position from top to bottom.
    pub row: usize,
    /// Horizontal position from left to right.
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Walks `steps` times along the direction. Returns [`None`] if the result leaves the board.
    pub fn offset(
        &self,
        direction: &ScanDirection,
        steps: isize,
        size: BoardSize,
    ) -> Option<Position> {
        let row = self.row as isize + direction.d_row * steps;
        let col = self.col as isize + direction.d_col * steps;
        is_valid_position(row, col, size).then(|| Position::new(row as usize, col as usize))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position { row, col }
    }
}

impl From<Position> for (usize, usize) {
    fn from(position: Position) -> Self {
        (position.row, position.col)
    }
}

/// The content of a single cell. On the wire this is `null` or the player index.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default, Hash, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum CellContent {
    /// There is no piece on the cell.
    #[default]
    Empty,
    /// There is a piece of the player with the indicated (zero based) index.
    Piece(usize),
}

impl CellContent {
    /// The owner of the piece, if there is one.
    pub fn owner(&self) -> Option<usize> {
        match self {
            CellContent::Empty => None,
            CellContent::Piece(player) => Some(*player),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

impl From<Option<usize>> for CellContent {
    fn from(value: Option<usize>) -> Self {
        value.map_or(CellContent::Empty, CellContent::Piece)
    }
}

impl From<CellContent> for Option<usize> {
    fn from(value: CellContent) -> Self {
        value.owner()
    }
}

/// Indicates a direction in which we walk from a cell.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ScanDirection {
    pub d_row: isize,
    pub d_col: isize,
}

use ScanDirection as D;
/// The four line axes of a square grid: horizontal, vertical, diagonal down-right, diagonal down-left.
/// The negated directions are covered by scanning every axis both ways.
#[rustfmt::skip]
pub const DIRECTIONS: [ScanDirection; 4] = [
    D { d_row: 0, d_col: 1 },
    D { d_row: 1, d_col: 0 },
    D { d_row: 1, d_col: 1 },
    D { d_row: 1, d_col: -1 },
];

/// Checks if the signed coordinates lie on a board of the indicated size.
pub fn is_valid_position(row: isize, col: isize, size: BoardSize) -> bool {
    row >= 0 && col >= 0 && (row as usize) < size.m && (col as usize) < size.n
}

/// The rectangular game board. Always fully populated with `m` rows of `n` cells.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    rows: Vec<Vec<CellContent>>,
}

impl Board {
    /// Creates a new board with every cell empty.
    pub fn empty(size: BoardSize) -> Self {
        Board {
            rows: vec![vec![CellContent::Empty; size.n]; size.m],
        }
    }

    /// Builds a board from raw rows, where `None` is an empty cell.
    pub fn from_rows(rows: Vec<Vec<Option<usize>>>) -> Self {
        Board {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(CellContent::from).collect())
                .collect(),
        }
    }

    pub fn size(&self) -> BoardSize {
        BoardSize {
            m: self.rows.len(),
            n: self.rows.first().map_or(0, Vec::len),
        }
    }

    /// Gets the content of the cell, [`None`] if the position is off the board.
    pub fn get(&self, position: Position) -> Option<CellContent> {
        self.rows
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
    }

    /// Checks if the position is on the board.
    pub fn contains(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// Checks if the position is on the board and holds no piece.
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.get(position) == Some(CellContent::Empty)
    }

    /// Sets a cell. Positions off the board are ignored.
    pub fn set(&mut self, position: Position, content: CellContent) {
        if let Some(cell) = self
            .rows
            .get_mut(position.row)
            .and_then(|row| row.get_mut(position.col))
        {
            *cell = content;
        }
    }

    /// True if every cell holds a piece.
    pub fn is_full(&self) -> bool {
        self.rows.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// All positions of the board in row major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let size = self.size();
        (0..size.m)
            .cartesian_product(0..size.n)
            .map(|(row, col)| Position { row, col })
    }

    /// Row wise access to the raw cells.
    pub fn rows(&self) -> &[Vec<CellContent>] {
        &self.rows
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty(crate::constants::DEFAULT_BOARD_SIZE)
    }
}
