//! Win and draw detection. A win is only ever searched for around the cell that just changed.

use crate::board::{Board, CellContent, DIRECTIONS, Position, ScanDirection};
use serde::{Deserialize, Serialize};

/// The result of a win check.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct WinCheck {
    pub is_win: bool,
    /// The cells of the winning line, empty if there is no win. Starts with the checked cell.
    pub winning_cells: Vec<Position>,
}

/// Counts the pieces of `player` along one axis through `origin`, first in positive then in
/// negative direction. Stops as soon as `win_length` cells are collected.
fn collect_along_axis(
    board: &Board,
    origin: Position,
    direction: &ScanDirection,
    player: usize,
    win_length: usize,
) -> Vec<Position> {
    let size = board.size();
    let mut cells = vec![origin];

    for sign in [1, -1] {
        for step in 1..win_length as isize {
            let Some(next) = origin.offset(direction, sign * step, size) else {
                break;
            };
            if board.get(next) != Some(CellContent::Piece(player)) {
                break;
            }
            cells.push(next);
            if cells.len() >= win_length {
                return cells;
            }
        }
    }
    cells
}

/// Checks if the piece of `player` at `origin` completes a line of `win_length`.
///
/// The axes are scanned in the order horizontal, vertical, diagonal down-right, diagonal
/// down-left and the first axis reaching the win length is reported. Lines on later axes are
/// not merged into the result.
pub fn check_win(board: &Board, origin: Position, player: usize, win_length: usize) -> WinCheck {
    for direction in DIRECTIONS.iter() {
        let cells = collect_along_axis(board, origin, direction, player, win_length);
        if cells.len() >= win_length {
            return WinCheck {
                is_win: true,
                winning_cells: cells,
            };
        }
    }
    WinCheck::default()
}

/// A draw is a completely filled board. Callers only ask when the last move did not win.
pub fn check_draw(board: &Board) -> bool {
    board.is_full()
}
