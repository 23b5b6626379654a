//! Applies a placement or a relocation to a copy of the board and works out the consequences:
//! winner, draw and whose turn is next.

use crate::board::{Board, CellContent, Position};
use crate::win_detection::{check_draw, check_win};
use serde::{Deserialize, Serialize};

/// The complete outcome of a move.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct MoveResult {
    pub new_board: Board,
    pub winner: Option<usize>,
    pub is_draw: bool,
    pub winning_cells: Vec<Position>,
    pub next_player: usize,
}

impl MoveResult {
    /// True if the move ended the game.
    pub fn game_over(&self) -> bool {
        self.winner.is_some() || self.is_draw
    }
}

/// Checks if the move would be legal: `to` is an empty cell on the board and `from`, if given,
/// holds a piece of another player while relocation is allowed.
pub fn is_legal_move(
    board: &Board,
    to: Position,
    current_player: usize,
    from: Option<Position>,
    allow_moving_opponent_pieces: bool,
) -> bool {
    if !board.is_empty_at(to) {
        return false;
    }
    match from {
        None => true,
        Some(_) if !allow_moving_opponent_pieces => false,
        Some(source) => matches!(
            board.get(source),
            Some(CellContent::Piece(owner)) if owner != current_player
        ),
    }
}

/// Executes the move on a copy of `board`. Legality is not checked here.
///
/// With `from` set, the piece keeps its owner while it moves, and the win check runs for
/// that owner rather than for `current_player`. An empty source cell degrades to a placement
/// for `current_player`.
pub fn process_move(
    board: &Board,
    to: Position,
    current_player: usize,
    win_length: usize,
    player_count: usize,
    from: Option<Position>,
) -> MoveResult {
    let mut new_board = board.clone();
    let mut piece_owner = current_player;

    if let Some(source) = from
        && let Some(CellContent::Piece(owner)) = board.get(source)
    {
        piece_owner = owner;
        new_board.set(source, CellContent::Empty);
    }
    new_board.set(to, CellContent::Piece(piece_owner));

    let win = check_win(&new_board, to, piece_owner, win_length);
    let is_draw = !win.is_win && check_draw(&new_board);
    let game_over = win.is_win || is_draw;

    MoveResult {
        winner: win.is_win.then_some(piece_owner),
        is_draw,
        winning_cells: win.winning_cells,
        next_player: if game_over {
            current_player
        } else {
            (current_player + 1) % player_count.max(1)
        },
        new_board,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;

    #[test]
    fn placement_writes_current_player_and_advances() {
        let board = Board::empty(BoardSize::new(3, 3));
        let result = process_move(&board, Position::new(1, 1), 1, 3, 2, None);
        assert_eq!(result.new_board.get(Position::new(1, 1)), Some(CellContent::Piece(1)));
        assert_eq!(result.next_player, 0);
        assert!(!result.game_over());
        // The input board is untouched.
        assert!(board.is_empty_at(Position::new(1, 1)));
    }

    #[test]
    fn turn_wraps_around_player_count() {
        let board = Board::empty(BoardSize::new(5, 5));
        assert_eq!(process_move(&board, Position::new(0, 0), 2, 4, 3, None).next_player, 0);
        assert_eq!(process_move(&board, Position::new(0, 0), 0, 4, 3, None).next_player, 1);
    }

    #[test]
    fn relocation_keeps_owner_and_credits_owner() {
        // Player 0 owns (0,0), (0,1) and (2,2). Player 1 drags (2,2) into (0,2).
        let mut board = Board::empty(BoardSize::new(4, 4));
        for pos in [Position::new(0, 0), Position::new(0, 1), Position::new(2, 2)] {
            board.set(pos, CellContent::Piece(0));
        }
        let result = process_move(
            &board,
            Position::new(0, 2),
            1,
            3,
            2,
            Some(Position::new(2, 2)),
        );
        assert!(result.new_board.is_empty_at(Position::new(2, 2)));
        assert_eq!(result.new_board.get(Position::new(0, 2)), Some(CellContent::Piece(0)));
        assert_eq!(result.winner, Some(0));
        assert_eq!(result.winning_cells.len(), 3);
        assert_eq!(result.next_player, 1);
    }

    #[test]
    fn relocation_scenario_without_win() {
        let mut board = Board::empty(BoardSize::new(4, 4));
        board.set(Position::new(2, 2), CellContent::Piece(0));
        let result = process_move(
            &board,
            Position::new(3, 3),
            1,
            3,
            2,
            Some(Position::new(2, 2)),
        );
        assert!(result.new_board.is_empty_at(Position::new(2, 2)));
        assert_eq!(result.new_board.get(Position::new(3, 3)), Some(CellContent::Piece(0)));
        assert_eq!(result.winner, None);
        assert_eq!(result.next_player, 0);
    }

    #[test]
    fn win_beats_draw_on_the_last_cell() {
        // X X _ / O O X / X O O, player 0 fills (0,2) and completes the top row.
        let board = Board::from_rows(vec![
            vec![Some(0), Some(0), None],
            vec![Some(1), Some(1), Some(0)],
            vec![Some(0), Some(1), Some(1)],
        ]);
        let result = process_move(&board, Position::new(0, 2), 0, 3, 2, None);
        assert!(result.new_board.is_full());
        assert_eq!(result.winner, Some(0));
        assert!(!result.is_draw);
        assert_eq!(result.next_player, 0);
    }

    #[test]
    fn full_board_without_line_is_draw() {
        // X O X / X O O / O X _, player 0 fills (2,2).
        let board = Board::from_rows(vec![
            vec![Some(0), Some(1), Some(0)],
            vec![Some(0), Some(1), Some(1)],
            vec![Some(1), Some(0), None],
        ]);
        let result = process_move(&board, Position::new(2, 2), 0, 3, 2, None);
        assert!(result.is_draw);
        assert_eq!(result.winner, None);
        assert!(result.winning_cells.is_empty());
        assert_eq!(result.next_player, 0);
    }

    #[test]
    fn legality() {
        let mut board = Board::empty(BoardSize::new(3, 3));
        board.set(Position::new(0, 0), CellContent::Piece(0));
        board.set(Position::new(1, 1), CellContent::Piece(1));
        let to = Position::new(2, 2);
        assert!(is_legal_move(&board, to, 1, None, true));
        assert!(!is_legal_move(&board, Position::new(0, 0), 1, None, true));
        assert!(!is_legal_move(&board, Position::new(3, 0), 1, None, true));
        assert!(is_legal_move(&board, to, 1, Some(Position::new(0, 0)), true));
        assert!(!is_legal_move(&board, to, 1, Some(Position::new(1, 1)), true));
        assert!(!is_legal_move(&board, to, 1, Some(Position::new(0, 1)), true));
    }

    #[test]
    fn relocation_is_illegal_when_the_rule_is_off() {
        let mut board = Board::empty(BoardSize::new(3, 3));
        board.set(Position::new(0, 0), CellContent::Piece(0));
        let from = Some(Position::new(0, 0));
        assert!(!is_legal_move(&board, Position::new(2, 2), 1, from, false));
        assert!(is_legal_move(&board, Position::new(2, 2), 1, None, false));
    }
}
