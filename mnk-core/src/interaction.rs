//! Translates a raw cell click plus the current selection into what the click means.
//! Nothing here touches game state, the caller decides how to realize the outcome.

use crate::board::{Board, CellContent, Position};
use serde::{Deserialize, Serialize};

/// Everything the interpreter needs to know about the situation the click happens in.
pub struct ClickContext<'a> {
    pub board: &'a Board,
    pub current_player: usize,
    pub selected_cell: Option<Position>,
    pub allow_moving_opponent_pieces: bool,
    pub click: Position,
}

/// The meaning of a click.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// Place a new piece at `to`, or relocate the piece at `from` to `to`.
    Move {
        to: Position,
        from: Option<Position>,
    },
    /// Remember the cell as the source of a following move.
    Select { cell: Position },
    /// Drop any selection.
    Deselect,
}

/// Interprets a click. The rules are applied in this order:
///
/// 1. Empty cell: a move, relocating the selected piece if there is a selection.
/// 2. The selected cell itself: deselect.
/// 3. Another player's piece while moving opponent pieces is allowed: select it.
/// 4. Anything else (own piece, rule disabled, off the board): deselect.
pub fn interpret_click(context: &ClickContext) -> ClickOutcome {
    let click = context.click;
    match context.board.get(click) {
        Some(CellContent::Empty) => ClickOutcome::Move {
            to: click,
            from: context.selected_cell,
        },
        Some(_) if context.selected_cell == Some(click) => ClickOutcome::Deselect,
        Some(CellContent::Piece(owner))
            if context.allow_moving_opponent_pieces && owner != context.current_player =>
        {
            ClickOutcome::Select { cell: click }
        }
        _ => ClickOutcome::Deselect,
    }
}
